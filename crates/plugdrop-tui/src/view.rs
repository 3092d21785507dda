//! Rendering of the session.

use std::path::Path;

use plugdrop_core::session::{InstallLocation, Session};
use ratatui::{
    Frame,
    layout::{Constraint, Layout},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Paragraph},
};

use crate::keymap::HELP;

const BANNER: [&str; 5] = [
    r"  ___ _   _  _  ___ ___  ___  ___  ___ ",
    r" | _ \ | | | |/ __|   \| _ \/ _ \| _ \",
    r" |  _/ |_| |_| (_ | |) |   / (_) |  _/",
    r" |_| |____\___/\___|___/|_|_\\___/|_|  ",
    r"",
];

pub fn render(frame: &mut Frame, session: &Session, catalog_dir: &Path) {
    let [banner_area, body_area] =
        Layout::vertical([Constraint::Length(BANNER.len() as u16), Constraint::Min(0)])
            .areas(frame.area());

    let banner: Vec<Line> = BANNER.iter().map(|row| Line::from(*row).cyan()).collect();
    frame.render_widget(Paragraph::new(banner), banner_area);

    let body = Paragraph::new(body_lines(session, catalog_dir))
        .block(Block::bordered().title(" plugdrop "));
    frame.render_widget(body, body_area);
}

fn body_lines<'a>(session: &'a Session, catalog_dir: &Path) -> Vec<Line<'a>> {
    let install = match session.install() {
        InstallLocation::Resolved(_) => Span::raw(session.install().display()),
        InstallLocation::Unresolved(_) => Span::raw(session.install().display()).red(),
    };
    let toggle = if session.toggle() {
        Span::raw("Enabled").green()
    } else {
        Span::raw("Disabled").red()
    };

    let mut lines = vec![
        Line::from(vec![Span::raw(" Install Path: "), install]),
        Line::from(vec![
            Span::raw(" Toggle: "),
            toggle,
            Span::raw(" (Press 't' to toggle)"),
        ]),
        Line::default(),
        Line::from(" Available Manifests:").bold(),
        Line::default(),
    ];

    if session.manifests().is_empty() {
        lines.push(Line::from(format!(
            "   No manifests found in {}",
            catalog_dir.display()
        )));
    } else {
        for (idx, manifest) in session.manifests().iter().enumerate() {
            if idx == session.cursor() {
                lines.push(
                    Line::from(format!("   > {manifest}")).style(
                        Style::default()
                            .fg(Color::Yellow)
                            .add_modifier(Modifier::BOLD),
                    ),
                );
            } else {
                lines.push(Line::from(format!("     {manifest}")));
            }
        }
    }

    lines.push(Line::default());
    lines.push(Line::from(vec![
        Span::raw(" Status: "),
        Span::raw(session.status()).bold(),
    ]));
    lines.push(Line::default());
    lines.push(Line::from(format!(" {HELP}")).dark_gray());
    lines
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use plugdrop_core::session::SessionEvent;
    use ratatui::{Terminal, backend::TestBackend};

    use super::*;

    fn screen(session: &Session) -> String {
        let mut terminal = Terminal::new(TestBackend::new(110, 30)).expect("test terminal");
        terminal
            .draw(|frame| render(frame, session, Path::new("./manifests")))
            .expect("draw");
        let buffer = terminal.backend().buffer();
        let width = buffer.area.width as usize;
        buffer
            .content
            .chunks(width)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn shows_install_toggle_list_and_status() {
        let mut session = Session::new(
            vec!["alpha".to_string(), "beta".to_string()],
            InstallLocation::Resolved(PathBuf::from("/opt/app")),
        );
        session.handle(SessionEvent::MoveDown);

        let text = screen(&session);

        assert!(text.contains("Install Path: /opt/app"));
        assert!(text.contains("Toggle: Enabled"));
        assert!(text.contains("     alpha"));
        assert!(text.contains("   > beta"));
        assert!(text.contains("Status: Ready"));
    }

    #[test]
    fn empty_catalog_and_unresolved_install() {
        let session = Session::new(
            Vec::new(),
            InstallLocation::Unresolved("setting Software/Vendor/App/InstallPath not found".into()),
        );

        let text = screen(&session);

        assert!(text.contains("Install Path: Error: setting Software/Vendor/App/InstallPath"));
        assert!(text.contains("No manifests found in ./manifests"));
    }

    #[test]
    fn disabled_toggle_is_shown() {
        let mut session = Session::new(
            Vec::new(),
            InstallLocation::Resolved(PathBuf::from("/opt/app")),
        );
        session.handle(SessionEvent::Toggle);

        assert!(screen(&session).contains("Toggle: Disabled"));
    }
}
