use std::collections::HashMap;

use store::model::contact::Contact;

/// Field values and field errors for the contact form, keyed by input name
#[derive(Debug, Default)]
pub struct FormData {
    pub values: HashMap<String, String>,
    pub errors: HashMap<String, String>,
}

// Implements: https://rust-unofficial.github.io/patterns/patterns/creational/builder.html
impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_value(mut self, field: &str, value: &str) -> Self {
        self.values.insert(field.to_string(), value.to_string());
        self
    }

    pub fn set_error(mut self, field: &str, message: &str) -> Self {
        self.errors.insert(field.to_string(), message.to_string());
        self
    }

    fn value(&self, field: &str) -> &str {
        self.values.get(field).map(String::as_str).unwrap_or("")
    }

    fn error(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }
}

// Everything user supplied goes through here before being interpolated into a
// fragment
fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());

    for character in raw.chars() {
        match character {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }

    escaped
}

/// The contact form. Submits itself over htmx and swaps itself out for
/// whichever form the response carries
pub fn render_form(form: &FormData) -> String {
    let email_error = match form.error("email") {
        Some(message) => format!("\n    <div class=\"error\">{}</div>", escape_html(message)),
        None => String::new(),
    };

    format!(
        r#"<form hx-post="/contacts" hx-swap="outerHTML">
    <label for="name">Name</label>
    <input type="text" id="name" name="name" value="{name}" />
    <label for="email">Email</label>
    <input type="email" id="email" name="email" value="{email}" />{email_error}
    <button type="submit">Add Contact</button>
</form>"#,
        name = escape_html(form.value("name")),
        email = escape_html(form.value("email")),
        email_error = email_error,
    )
}

/// A single contact row. The delete button targets its own row and leaves a
/// half second for the removal animation, the spinner shows while the delete
/// request is in flight
pub fn render_contact(contact: &Contact) -> String {
    format!(
        r##"<div class="contact" id="contact-{id}">
    <span class="contact-details">{name} - {email}</span>
    <button hx-delete="/contacts/{id}"
        hx-target="#contact-{id}"
        hx-swap="outerHTML swap:500ms"
        hx-indicator="#indicator-{id}">Delete</button>
    <img id="indicator-{id}" class="htmx-indicator" src="/images/bars.svg" alt="deleting" />
</div>"##,
        id = contact.id,
        name = escape_html(&contact.name),
        email = escape_html(&contact.email),
    )
}

/// A contact row wrapped for an out of band append onto the #contacts list
pub fn render_oob_contact(contact: &Contact) -> String {
    format!(
        "<div id=\"contacts\" hx-swap-oob=\"beforeend\">{}</div>",
        render_contact(contact)
    )
}

/// The full page, form on top and the contact list below it
pub fn render_index(contacts: &[Contact], form: &FormData) -> String {
    let rendered_contacts = contacts
        .iter()
        .map(render_contact)
        .collect::<Vec<String>>()
        .join("\n");

    format!(
        r#"<!DOCTYPE html>
<html lang="en">

<head>
    <meta charset="UTF-8" />
    <meta name="viewport" content="width=device-width, initial-scale=1.0" />
    <title>Contacts</title>
    <link rel="stylesheet" href="/css/styles.css" />
    <script src="https://unpkg.com/htmx.org@1.9.10"></script>
</head>

<body>
    <main>
        <h1>Contacts</h1>
        {form}
        <div id="contacts">
{contacts}
        </div>
    </main>
</body>

</html>"#,
        form = render_form(form),
        contacts = rendered_contacts,
    )
}
