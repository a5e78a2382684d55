use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::{App, LoginFocus, Page};
use crate::models::User;

use super::styles;

/// Width of the text field interiors on the login form
const FIELD_WIDTH: usize = 24;

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Min(8),    // Page content
            Constraint::Length(2), // Key hints
        ])
        .split(frame.area());

    render_title_bar(frame, app, chunks[0]);
    match app.page {
        Page::Home => render_home_page(frame, app, chunks[1]),
        Page::Login => render_login_page(frame, app, chunks[1]),
    }
    render_key_hints(frame, app, chunks[2]);
}

fn render_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let title = "  Snaproom";
    let page_label = match app.page {
        Page::Home => "Home",
        Page::Login => "Login",
    };

    let title_line = Line::from(vec![
        Span::styled(title, styles::title_style()),
        Span::raw(" ".repeat(
            (area.width as usize).saturating_sub(title.len() + page_label.len() + 2),
        )),
        Span::styled(page_label, styles::muted_style()),
    ]);

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    frame.render_widget(Paragraph::new(title_line).block(block), area);
}

fn render_home_page(frame: &mut Frame, app: &App, area: Rect) {
    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled("  Welcome to Snaproom", styles::title_style())),
        Line::from(""),
    ];
    lines.extend(auth_widget_lines(app.session.user()));

    frame.render_widget(Paragraph::new(lines), area);
}

/// Auth widget: a user card when logged in, a login prompt otherwise.
pub fn auth_widget_lines(user: Option<&User>) -> Vec<Line<'static>> {
    let Some(user) = user else {
        return vec![
            Line::from(Span::raw("  Please log in to continue")),
            Line::from(""),
            Line::from(vec![
                Span::styled("  [l]", styles::help_key_style()),
                Span::raw(" Login"),
            ]),
        ];
    };

    user_card_lines(user)
}

/// User card: avatar placeholder (or URL), display name, email.
pub fn user_card_lines(user: &User) -> Vec<Line<'static>> {
    let avatar = match (&user.avatar, user.avatar_initial()) {
        (Some(url), _) => Span::styled(format!("  ⊡ {}", url), styles::muted_style()),
        (None, Some(initial)) => Span::styled(format!("  ({})", initial), styles::highlight_style()),
        (None, None) => Span::styled("  (?)", styles::muted_style()),
    };

    vec![
        Line::from(avatar),
        Line::from(Span::styled(
            format!("  {}", user.name),
            styles::field_style(),
        )),
        Line::from(Span::styled(
            format!("  {}", user.email),
            styles::muted_style(),
        )),
    ]
}

fn render_login_page(frame: &mut Frame, app: &App, area: Rect) {
    let height = if app.login_error.is_some() { 12 } else { 10 };
    let dialog = centered_rect_fixed(FIELD_WIDTH as u16 + 18, height, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .title(" Login ");

    frame.render_widget(Paragraph::new(login_form_lines(app)).block(block), dialog);
}

/// Login form body: email field, masked password field, submit button and
/// the form-level error, if any.
pub fn login_form_lines(app: &App) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from("")];

    lines.push(field_line(
        "Email",
        &app.login_email,
        app.login_focus == LoginFocus::Email,
    ));
    lines.push(Line::from(""));

    let masked: String = "*".repeat(app.login_password.chars().count().min(FIELD_WIDTH));
    lines.push(field_line(
        "Password",
        &masked,
        app.login_focus == LoginFocus::Password,
    ));
    lines.push(Line::from(""));

    let button_focused = app.login_focus == LoginFocus::Button;
    let label = if app.session.is_loading() {
        " Logging in... "
    } else if button_focused {
        " ▶ Login ◀ "
    } else {
        "   Login   "
    };
    let button_style = if button_focused {
        styles::selected_style()
    } else {
        styles::field_style()
    };
    lines.push(Line::from(vec![
        Span::raw("       ["),
        Span::styled(label.to_string(), button_style),
        Span::raw("]"),
    ]));

    if let Some(ref error) = app.login_error {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!(" {}", error),
            styles::error_style(),
        )));
    }

    lines
}

fn field_line(label: &str, value: &str, focused: bool) -> Line<'static> {
    let style = if focused {
        styles::selected_style()
    } else {
        styles::field_style()
    };
    // Show the tail of the value when it outgrows the field
    let tail: Vec<char> = value.chars().rev().take(FIELD_WIDTH).collect();
    let shown: String = tail.into_iter().rev().collect();
    let cursor = if focused { "▌" } else { "" };
    Line::from(vec![
        Span::styled(format!(" {:>8}: [", label), styles::muted_style()),
        Span::styled(
            format!("{:<width$}", format!("{}{}", shown, cursor), width = FIELD_WIDTH),
            style,
        ),
        Span::styled("]", styles::muted_style()),
    ])
}

fn render_key_hints(frame: &mut Frame, app: &App, area: Rect) {
    let hints: &[(&str, &str)] = match app.page {
        Page::Home if app.session.is_authenticated() => {
            &[("l", "Logout"), ("q", "Quit")]
        }
        Page::Home => &[("l", "Login"), ("q", "Quit")],
        Page::Login => &[("Tab", "Next field"), ("Enter", "Submit"), ("Esc", "Back")],
    };

    let mut spans = vec![Span::raw(" ")];
    for (i, (key, desc)) in hints.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled("  |  ", styles::muted_style()));
        }
        spans.push(Span::styled(format!("[{}]", key), styles::help_key_style()));
        spans.push(Span::raw(format!(" {}", desc)));
    }

    let block = Block::default()
        .borders(Borders::TOP)
        .border_style(styles::muted_style());

    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

/// Create a centered rectangle with fixed dimensions
fn centered_rect_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(r.width), height.min(r.height))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line_text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    fn lines_text(lines: &[Line]) -> String {
        lines.iter().map(|l| line_text(l) + "\n").collect()
    }

    #[test]
    fn test_auth_widget_prompts_when_logged_out() {
        let text = lines_text(&auth_widget_lines(None));
        assert!(text.contains("Please log in to continue"));
        assert!(text.contains("[l] Login"));
    }

    #[test]
    fn test_auth_widget_shows_user_card_when_logged_in() {
        let user = User {
            id: "1".to_string(),
            name: "A".to_string(),
            email: "a@b.com".to_string(),
            avatar: None,
        };
        let text = lines_text(&auth_widget_lines(Some(&user)));
        assert!(text.contains("A"));
        assert!(text.contains("a@b.com"));
        assert!(!text.contains("Please log in"));
    }

    #[test]
    fn test_user_card_uses_initial_without_avatar() {
        let user = User {
            id: "1".to_string(),
            name: "alice".to_string(),
            email: "alice@example.com".to_string(),
            avatar: None,
        };
        let text = lines_text(&user_card_lines(&user));
        assert!(text.contains("(A)"));
    }

    #[test]
    fn test_login_form_masks_password_and_shows_error() {
        use crate::api::ApiClient;
        use crate::auth::{AuthSession, MemoryTokenStore, TokenStore};
        use crate::config::Config;
        use std::sync::Arc;

        let store: Arc<dyn TokenStore> = Arc::new(MemoryTokenStore::new());
        let config = Config {
            api_base_url: "http://localhost:3001/api".to_string(),
        };
        let api = ApiClient::new(&config.api_base_url, Arc::clone(&store));
        let mut app = App::with_session(config, AuthSession::new(api, store));
        app.login_email = "a@b.com".to_string();
        app.login_password = "secret".to_string();
        app.login_error = Some("Invalid email or password".to_string());

        let text = lines_text(&login_form_lines(&app));
        assert!(text.contains("a@b.com"));
        assert!(text.contains("******"));
        assert!(!text.contains("secret"));
        assert!(text.contains("Invalid email or password"));

        // Mask length follows chars, not bytes
        app.login_password = "pässwörd".to_string();
        let text = lines_text(&login_form_lines(&app));
        assert_eq!(text.matches('*').count(), 8);
    }

    #[test]
    fn test_user_card_shows_avatar_url_when_set() {
        let user = User {
            id: "1".to_string(),
            name: "alice".to_string(),
            email: "alice@example.com".to_string(),
            avatar: Some("https://cdn.example.com/a.png".to_string()),
        };
        let text = lines_text(&user_card_lines(&user));
        assert!(text.contains("https://cdn.example.com/a.png"));
        assert!(!text.contains("(A)"));
    }
}
