//! Static HTML rendering of the board, used by `--export-html`.

use crate::theme::Theme;
use crate::view::BoardView;

pub fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn render_card(id: i64, title: &str, description: &str) -> String {
    format!(
        "<div class=\"task\" data-id=\"{id}\"><h4>{}</h4><p>{}</p>\
         <button class=\"editBtn\" type=\"button\">Edit</button>\
         <button class=\"deleteBtn\" type=\"button\">Delete</button></div>",
        escape_html(title),
        escape_html(description),
    )
}

pub fn render_document(view: &BoardView, theme: Theme) -> String {
    let mut html = String::new();
    let body_class = match theme {
        Theme::Light => "",
        Theme::Dark => " class=\"dark\"",
    };

    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str("<title>Task Board</title>\n</head>\n");
    html.push_str(&format!("<body{body_class}>\n<main class=\"board\">\n"));
    for column in &view.columns {
        html.push_str(&format!(
            "<section class=\"column\"><h3>{} <span class=\"count\">{}</span></h3>\
             <div class=\"taskList\" id=\"{}\">\n",
            escape_html(&column.title),
            column.count(),
            escape_html(&column.id),
        ));
        for card in &column.cards {
            html.push_str(&render_card(card.id.0, &card.title, &card.description));
            html.push('\n');
        }
        html.push_str("</div></section>\n");
    }
    html.push_str("</main>\n</body>\n</html>\n");
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::{default_columns, Task, TaskId};
    use crate::view;

    #[test]
    fn escapes_markup_characters() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & Jerry's</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; Jerry&#039;s&lt;/a&gt;"
        );
    }

    #[test]
    fn script_titles_are_never_emitted_raw() {
        let tasks = vec![Task {
            id: TaskId(1),
            title: "<script>alert(1)</script>".to_string(),
            description: "<img onerror=x>".to_string(),
            status: "todo".to_string(),
        }];
        let doc = render_document(&view::render(&tasks, &default_columns()), Theme::Light);

        assert!(doc.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(doc.contains("&lt;img onerror=x&gt;"));
        assert!(!doc.contains("<script>"));
    }

    #[test]
    fn cards_carry_edit_and_delete_controls() {
        let card = render_card(42, "Title", "");
        assert!(card.starts_with("<div class=\"task\" data-id=\"42\">"));
        assert!(card.contains("<button class=\"editBtn\" type=\"button\">Edit</button>"));
        assert!(card.contains("<button class=\"deleteBtn\" type=\"button\">Delete</button>"));
    }

    #[test]
    fn dark_theme_marks_body() {
        let doc = render_document(&BoardView::default(), Theme::Dark);
        assert!(doc.contains("<body class=\"dark\">"));
    }
}
