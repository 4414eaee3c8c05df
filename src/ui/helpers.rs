use anyhow::Error;
use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Produce a rectangle centered within `area` that spans the requested percent
/// of the width and height. Used for modal dialogs.
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(area);

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(horizontal[1]);

    vertical[1]
}

/// Rectangle of a fixed size anchored at `(x, y)`, clipped to `area`.
pub(crate) fn anchored_rect(x: u16, y: u16, width: u16, height: u16, area: Rect) -> Rect {
    let x = x.min(area.right().saturating_sub(1)).max(area.x);
    let y = y.min(area.bottom().saturating_sub(1)).max(area.y);
    Rect {
        x,
        y,
        width: width.min(area.right().saturating_sub(x)),
        height: height.min(area.bottom().saturating_sub(y)),
    }
}

/// Extract the most relevant error message from a chained error.
pub(crate) fn surface_error(err: &Error) -> String {
    err.chain()
        .last()
        .map(|cause| cause.to_string())
        .unwrap_or_else(|| err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{anyhow, Context};

    #[test]
    fn surface_error_reports_root_cause() {
        let err = Err::<(), _>(anyhow!("Student not found"))
            .context("failed to update student")
            .unwrap_err();
        assert_eq!(surface_error(&err), "Student not found");
    }

    #[test]
    fn anchored_rect_is_clipped_to_area() {
        let area = Rect::new(0, 0, 20, 10);
        let rect = anchored_rect(15, 8, 10, 5, area);
        assert_eq!(rect, Rect::new(15, 8, 5, 2));
    }

    #[test]
    fn centered_rect_stays_inside_area() {
        let area = Rect::new(0, 0, 100, 50);
        let rect = centered_rect(60, 40, area);
        assert!(rect.x >= 20 && rect.right() <= 80);
        assert!(rect.y >= 15 && rect.bottom() <= 35);
    }
}
