//! Canvas serialization for the request payload.

use base64::{Engine as _, engine::general_purpose::STANDARD};

use super::types::PredictionError;
use crate::draw::SketchSurface;

const PNG_DATA_URL_PREFIX: &str = "data:image/png;base64,";

/// Encodes the canvas bitmap as PNG bytes.
pub fn encode_sketch(sketch: &SketchSurface) -> Result<Vec<u8>, PredictionError> {
    sketch
        .encode_png()
        .map_err(|e| PredictionError::Encode(e.to_string()))
}

/// Wraps PNG bytes in a `data:image/png;base64,...` URL.
pub fn png_data_url(png: &[u8]) -> String {
    let mut url = String::with_capacity(PNG_DATA_URL_PREFIX.len() + png.len().div_ceil(3) * 4);
    url.push_str(PNG_DATA_URL_PREFIX);
    STANDARD.encode_string(png, &mut url);
    url
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::Point;

    #[test]
    fn data_url_has_png_prefix_and_standard_alphabet() {
        assert_eq!(png_data_url(&[0xfb, 0xff]), "data:image/png;base64,+/8=");
    }

    #[test]
    fn encoded_sketch_round_trips_through_data_url() {
        let mut sketch = SketchSurface::new(28, 28, 4.0).unwrap();
        sketch.begin(Point::new(14.0, 4.0));
        sketch.extend(Point::new(14.0, 24.0));

        let png = encode_sketch(&sketch).unwrap();
        let url = png_data_url(&png);
        let payload = url.strip_prefix(PNG_DATA_URL_PREFIX).unwrap();
        assert_eq!(STANDARD.decode(payload).unwrap(), png);
    }
}
