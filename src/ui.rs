/// UI rendering: canvas frame, buttons, result panel, error notice
use crate::draw::{
    ACCENT, Color, FontDescriptor, MUTED, PANEL_BG, TEXT, WHITE, fill_rounded_rect,
    measure_text, render_canvas, render_text, stroke_rounded_rect,
};
use crate::input::{InputState, PanelButton};
use crate::predict::format_percent;
use crate::presenter::PresenterPhase;
use crate::util::Rect;

// ============================================================================
// UI Layout Constants (not configurable)
// ============================================================================

const CORNER_RADIUS: f64 = 10.0;
const PANEL_PADDING: f64 = 18.0;
const BUTTON_FONT_SIZE: f64 = 15.0;
const LABEL_FONT_SIZE: f64 = 13.0;
const DIGIT_FONT_SIZE: f64 = 96.0;
const RANKED_FONT_SIZE: f64 = 15.0;
const RANKED_ROW_HEIGHT: f64 = 30.0;
const NOTICE_FONT_SIZE: f64 = 13.0;

/// Subtle surface for the result panel and idle buttons.
const SURFACE: Color = Color::new(1.0, 1.0, 1.0, 0.06);
/// Outline around the canvas.
const CANVAS_BORDER: Color = Color::new(1.0, 1.0, 1.0, 0.25);
/// Error notice background.
const NOTICE_BG: Color = crate::draw::ERROR_RED;

/// Render the whole window: background, canvas, buttons, result panel and notice.
pub fn render_window(ctx: &cairo::Context, input_state: &InputState, font: &FontDescriptor) {
    let layout = &input_state.layout;

    ctx.save().ok();
    ctx.set_operator(cairo::Operator::Source);
    PANEL_BG.apply(ctx);
    let _ = ctx.paint();
    ctx.restore().ok();

    render_canvas(ctx, &input_state.sketch, layout.canvas);
    stroke_rounded_rect(ctx, grow(layout.canvas, 1), 2.0, CANVAS_BORDER, 2.0);

    render_button(ctx, input_state, PanelButton::Clear, font);
    render_button(ctx, input_state, PanelButton::Predict, font);
    render_result_panel(ctx, input_state, font);

    if let Some(message) = input_state.presenter.error_message() {
        render_error_notice(ctx, layout.result_panel, message, font);
    }
}

fn render_button(
    ctx: &cairo::Context,
    input_state: &InputState,
    button: PanelButton,
    font: &FontDescriptor,
) {
    let rect = input_state.layout.button_rect(button);
    let pressed = input_state.pressed_button == Some(button);

    let (label, fill, text) = match button {
        PanelButton::Clear => ("Clear", SURFACE, TEXT),
        PanelButton::Predict if !input_state.can_submit() => ("Predicting…", SURFACE, MUTED),
        PanelButton::Predict => ("Predict", ACCENT, WHITE),
    };

    fill_rounded_rect(ctx, rect, CORNER_RADIUS, fill);
    if pressed {
        fill_rounded_rect(ctx, rect, CORNER_RADIUS, Color::new(0.0, 0.0, 0.0, 0.2));
    }

    let bold = font.with_weight("bold");
    let (w, h) = measure_text(ctx, label, BUTTON_FONT_SIZE, &bold);
    let x = rect.x as f64 + (rect.width as f64 - w) / 2.0;
    let y = rect.y as f64 + (rect.height as f64 - h) / 2.0;
    render_text(ctx, x, y, label, text, BUTTON_FONT_SIZE, &bold);
}

fn render_result_panel(ctx: &cairo::Context, input_state: &InputState, font: &FontDescriptor) {
    let panel = input_state.layout.result_panel;
    fill_rounded_rect(ctx, panel, CORNER_RADIUS, SURFACE);

    let left = panel.x as f64 + PANEL_PADDING;
    let mut y = panel.y as f64 + PANEL_PADDING;

    match input_state.presenter.phase() {
        PresenterPhase::Showing(prediction) => {
            let (_, h) = render_text(ctx, left, y, "Prediction", MUTED, LABEL_FONT_SIZE, font);
            y += h + 4.0;

            let digit = prediction.digit.to_string();
            let (_, h) = render_text(
                ctx,
                left,
                y,
                &digit,
                TEXT,
                DIGIT_FONT_SIZE,
                &font.with_weight("bold"),
            );
            y += h;

            if let Some(confidence) = prediction.confidence {
                let line = format!("{} confidence", format_percent(confidence));
                let (_, h) = render_text(ctx, left, y, &line, TEXT, LABEL_FONT_SIZE, font);
                y += h + 2.0;
            }
            if let Some(label) = prediction.method_label() {
                let (_, h) = render_text(ctx, left, y, label, MUTED, LABEL_FONT_SIZE, font);
                y += h;
            }

            let entries = input_state.presenter.ranked_entries();
            if !entries.is_empty() {
                y += 16.0;
                let (_, h) =
                    render_text(ctx, left, y, "Top predictions", MUTED, LABEL_FONT_SIZE, font);
                y += h + 6.0;

                let row_width = panel.width - (PANEL_PADDING * 2.0) as i32;
                for entry in entries {
                    if let Some(row) =
                        Rect::new(left as i32, y as i32, row_width, RANKED_ROW_HEIGHT as i32 - 4)
                    {
                        let fill = if entry.is_top { ACCENT } else { SURFACE };
                        fill_rounded_rect(ctx, row, 6.0, fill);

                        let text_y = y + 4.0;
                        render_text(
                            ctx,
                            left + 10.0,
                            text_y,
                            &entry.digit.to_string(),
                            TEXT,
                            RANKED_FONT_SIZE,
                            &font.with_weight("bold"),
                        );
                        let percent = format_percent(entry.confidence);
                        let (w, _) = measure_text(ctx, &percent, RANKED_FONT_SIZE, font);
                        render_text(
                            ctx,
                            left + row_width as f64 - w - 10.0,
                            text_y,
                            &percent,
                            TEXT,
                            RANKED_FONT_SIZE,
                            font,
                        );
                    }
                    y += RANKED_ROW_HEIGHT;
                }
            }
        }
        PresenterPhase::Awaiting => {
            render_text(ctx, left, y, "Analyzing…", MUTED, LABEL_FONT_SIZE, font);
        }
        PresenterPhase::Idle | PresenterPhase::Error { .. } => {
            let hint = if input_state.sketch.is_blank() {
                "Draw a digit"
            } else {
                "Press Predict"
            };
            let (_, h) = render_text(
                ctx,
                left,
                y,
                hint,
                TEXT,
                BUTTON_FONT_SIZE,
                &font.with_weight("bold"),
            );
            y += h + 4.0;
            let detail = format!(
                "Brush {}px · scroll to resize",
                input_state.sketch.stroke_width().round() as i32
            );
            render_text(ctx, left, y, &detail, MUTED, LABEL_FONT_SIZE, font);
        }
    }
}

fn render_error_notice(ctx: &cairo::Context, panel: Rect, message: &str, font: &FontDescriptor) {
    let max_width = (panel.width as f64 - PANEL_PADDING * 2.0).max(1.0);

    let layout = pangocairo::functions::create_layout(ctx);
    let font_desc = pango::FontDescription::from_string(&font.to_pango_string(NOTICE_FONT_SIZE));
    layout.set_font_description(Some(&font_desc));
    layout.set_width((max_width - 20.0).max(1.0) as i32 * pango::SCALE);
    layout.set_wrap(pango::WrapMode::WordChar);
    layout.set_text(message);
    let (_ink, logical) = layout.extents();
    let text_height = logical.height() as f64 / pango::SCALE as f64;

    let box_height = text_height + 20.0;
    let x = panel.x as f64 + PANEL_PADDING;
    let y = (panel.y + panel.height) as f64 - PANEL_PADDING - box_height;
    if let Some(rect) = Rect::new(x as i32, y as i32, max_width as i32, box_height.ceil() as i32) {
        fill_rounded_rect(ctx, rect, 8.0, NOTICE_BG);
    }

    ctx.move_to(x + 10.0, y + 10.0);
    WHITE.apply(ctx);
    pangocairo::functions::show_layout(ctx, &layout);
}

fn grow(rect: Rect, by: i32) -> Rect {
    Rect {
        x: rect.x - by,
        y: rect.y - by,
        width: rect.width + by * 2,
        height: rect.height + by * 2,
    }
}
