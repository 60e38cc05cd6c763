//! HTML page and chat message templates
//!
//! The page is a single form-driven document with no client-side code: dark
//! two-tone chat bubbles with avatar and message columns, an upload sidebar,
//! and a question form that only becomes active once documents have been
//! processed.

use crate::session::SessionView;
use crate::types::{Role, StatusKind};

const CSS: &str = r#"
body {
    margin: 0;
    font-family: "Segoe UI", system-ui, sans-serif;
    background-color: #0e1117;
    color: #fafafa;
}
.layout { display: flex; min-height: 100vh; }
.sidebar {
    width: 21rem;
    padding: 1.5rem;
    background-color: #262730;
    box-sizing: border-box;
}
.sidebar h2 { margin-top: 0; font-size: 1.1rem; }
.sidebar form { margin-bottom: 1rem; }
.sidebar input[type=file] { width: 100%; margin-bottom: 0.75rem; color: #fafafa; }
.main { flex: 1; padding: 2rem 3rem; box-sizing: border-box; max-width: 52rem; }
button {
    background-color: #ff4b4b;
    color: #fff;
    border: none;
    border-radius: 0.5rem;
    padding: 0.4rem 1rem;
    cursor: pointer;
}
.ask-form { display: flex; gap: 0.5rem; margin-bottom: 1.5rem; }
.ask-form input[type=text] {
    flex: 1;
    padding: 0.5rem;
    border-radius: 0.5rem;
    border: 1px solid #41444e;
    background-color: #262730;
    color: #fafafa;
}
.status { padding: 0.75rem 1rem; border-radius: 0.5rem; margin-bottom: 1rem; }
.status.success { background-color: #173928; color: #7ee8a2; }
.status.warning { background-color: #4a3c12; color: #ffe16a; }
.status.error { background-color: #4a1919; color: #ff8a8a; }
.preview {
    background-color: #0e1117;
    border: 1px solid #41444e;
    border-radius: 0.5rem;
    padding: 0.75rem;
    max-height: 18rem;
    overflow: auto;
    white-space: pre-wrap;
    word-break: break-word;
    font-size: 0.8rem;
}
.doc-list { list-style: none; padding: 0; font-size: 0.85rem; }
.doc-list li { margin-bottom: 0.25rem; color: #c7c9d1; }
.chat-message {
    padding: 1rem; border-radius: 0.5rem; margin-bottom: 1rem; display: flex;
}
.chat-message.user {
    background-color: #2b313e;
}
.chat-message.bot {
    background-color: #475063;
}
.chat-message .avatar {
    width: 15%;
    font-size: 2rem;
    text-align: center;
}
.chat-message .message {
    width: 85%;
    padding: 0 1.5rem;
    color: #fff;
    white-space: pre-wrap;
    word-break: break-word;
    align-self: center;
}
"#;

const USER_TEMPLATE: &str = r#"<div class="chat-message user">
    <div class="avatar">&#129489;</div>
    <div class="message">{{MSG}}</div>
</div>"#;

const BOT_TEMPLATE: &str = r#"<div class="chat-message bot">
    <div class="avatar">&#129302;</div>
    <div class="message">{{MSG}}</div>
</div>"#;

/// Escape text for embedding in HTML
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Render one transcript entry with the role's bubble template
pub fn render_message(role: Role, content: &str) -> String {
    let template = match role {
        Role::Human => USER_TEMPLATE,
        Role::Assistant => BOT_TEMPLATE,
    };
    template.replace("{{MSG}}", &escape_html(content))
}

/// Render the whole page for one session
pub fn render_page(view: &SessionView) -> String {
    let mut sidebar = String::new();
    sidebar.push_str("<h2>Your documents</h2>");
    sidebar.push_str(
        r#"<form action="/process" method="post" enctype="multipart/form-data">
<input type="file" name="documents" accept="application/pdf" multiple>
<button type="submit">Process</button>
</form>"#,
    );

    if !view.documents.is_empty() {
        sidebar.push_str("<ul class=\"doc-list\">");
        for doc in &view.documents {
            sidebar.push_str(&format!(
                "<li>{} &middot; {} page(s)</li>",
                escape_html(&doc.filename),
                doc.pages
            ));
        }
        sidebar.push_str("</ul>");
    }

    if let Some(preview) = &view.preview {
        sidebar.push_str("<h2>Extracted text preview</h2>");
        sidebar.push_str(&format!(
            "<pre class=\"preview\">{}</pre>",
            escape_html(preview)
        ));
    }

    let status = match &view.status {
        Some(status) => {
            let class = match status.kind {
                StatusKind::Success => "success",
                StatusKind::Warning => "warning",
                StatusKind::Error => "error",
            };
            format!(
                "<div class=\"status {}\">{}</div>",
                class,
                escape_html(&status.message)
            )
        }
        None => String::new(),
    };

    let disabled = if view.has_engine { "" } else { " disabled" };
    let ask_form = format!(
        r#"<form action="/ask" method="post" class="ask-form">
<input type="text" name="question" placeholder="Ask a question about your documents"{disabled}>
<button type="submit"{disabled}>Ask</button>
</form>"#
    );

    let mut transcript = String::new();
    for entry in &view.transcript {
        transcript.push_str(&render_message(entry.role, &entry.content));
    }

    format!(
        r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Chat with your PDFs</title>
<style>{CSS}</style>
</head>
<body>
<div class="layout">
<aside class="sidebar">
{sidebar}
</aside>
<main class="main">
<h1>Chat with your PDFs &#128218;</h1>
{status}
{ask_form}
{transcript}
</main>
</div>
</body>
</html>"#
    )
}
