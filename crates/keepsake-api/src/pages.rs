//! Server-rendered HTML. Every piece of user text goes through
//! [`escape_html`] before it reaches a page.

use chrono::{DateTime, NaiveDate, Utc};

const STYLE: &str = "
body { margin: 0; min-height: 100vh; display: flex; align-items: center; justify-content: center;
       background: linear-gradient(#fff5f0, #ffe6e6); font-family: Georgia, serif; color: #330000; }
main { max-width: 36rem; padding: 2.5rem; background: #fffafa; border: 3px solid #e6b0aa; border-radius: 1rem; }
h1 { color: #8b0000; text-align: center; }
.message { font-style: italic; font-size: 1.4rem; line-height: 1.6; text-align: center; }
.meta { color: #8b0000; font-size: 0.9rem; text-align: center; }
textarea, input { width: 100%; box-sizing: border-box; margin-bottom: 0.8rem; padding: 0.5rem; }
button, .button { background: #8b0000; color: #fff; border: 0; padding: 0.6rem 1.2rem; border-radius: 0.5rem;
                  text-decoration: none; cursor: pointer; }
";

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!doctype html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{}</title>\n<style>{}</style>\n</head>\n<body>\n<main>\n{}\n</main>\n</body>\n</html>\n",
        escape_html(title),
        STYLE,
        body
    )
}

/// The creation form. Posts the form, then shows the returned link.
pub fn create_page() -> String {
    layout(
        "Valentine Capsule",
        r#"<h1>Write a Capsule</h1>
<form id="capsule">
<input name="title" placeholder="Title (optional)">
<input name="sender_name" placeholder="From (optional)">
<input name="recipient_name" placeholder="To (optional)">
<textarea name="message" rows="6" placeholder="Your message" required></textarea>
<button type="submit">Seal it</button>
</form>
<p id="result" class="meta"></p>
<script>
document.getElementById("capsule").addEventListener("submit", async (event) => {
  event.preventDefault();
  const result = document.getElementById("result");
  const response = await fetch("/", { method: "POST", body: new URLSearchParams(new FormData(event.target)) });
  const data = await response.json();
  result.textContent = data.link ? "Share this link: " + data.link : data.error;
});
</script>"#,
    )
}

pub struct CapsuleView<'a> {
    pub id: &'a str,
    pub title: Option<&'a str>,
    pub sender_name: Option<&'a str>,
    pub recipient_name: Option<&'a str>,
    pub created_at: DateTime<Utc>,
    pub unlock_at: NaiveDate,
    /// `Some` once unlocked.
    pub message: Option<&'a str>,
}

pub fn view_page(view: &CapsuleView<'_>) -> String {
    let heading = escape_html(view.title.unwrap_or("A Capsule For You"));
    let mut body = format!("<h1>{}</h1>\n", heading);

    if let Some(to) = view.recipient_name {
        body.push_str(&format!("<p class=\"meta\">To {}</p>\n", escape_html(to)));
    }

    match view.message {
        Some(message) => {
            let paragraphs: Vec<String> = message.lines().map(escape_html).collect();
            body.push_str(&format!("<p class=\"message\">{}</p>\n", paragraphs.join("<br>")));
            if let Some(from) = view.sender_name {
                body.push_str(&format!("<p class=\"meta\">With love, {}</p>\n", escape_html(from)));
            }
            body.push_str(&format!(
                "<p class=\"meta\">Written {}</p>\n<p class=\"meta\"><a class=\"button\" href=\"/generate-image/{}\">Download keepsake</a></p>",
                view.created_at.format("%B %-d, %Y"),
                escape_html(view.id)
            ));
        }
        None => {
            body.push_str(&format!(
                "<p class=\"message\">This capsule is sealed until {}.</p>\n<p class=\"meta\">Come back then.</p>",
                view.unlock_at.format("%B %-d, %Y")
            ));
        }
    }

    layout(view.title.unwrap_or("Valentine Capsule"), &body)
}

pub fn error_page(message: &str) -> String {
    layout(
        "Valentine Capsule",
        &format!("<h1>Oh no</h1>\n<p class=\"message\">{}</p>", escape_html(message)),
    )
}
