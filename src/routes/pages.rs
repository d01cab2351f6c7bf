// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Minimal server-rendered admin pages.

const STYLE: &str = "body{font-family:system-ui,sans-serif;max-width:960px;margin:2rem auto;padding:0 1rem}\
input,textarea,button{font:inherit;padding:.4rem}textarea{width:100%;height:60vh;font-family:monospace}\
.error{color:#b00020}.row{margin:.5rem 0}";

/// Escape text for safe inclusion in HTML element content.
fn escape_html(text: &str) -> String {
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

/// Login form, optionally showing an error message.
pub fn login_page(error: Option<&str>) -> String {
    let error = error
        .map(|e| format!(r#"<p class="error">{}</p>"#, escape_html(e)))
        .unwrap_or_default();

    format!(
        r#"<!DOCTYPE html>
<html><head><meta charset="utf-8"><title>Admin login</title><style>{STYLE}</style></head>
<body><h1>Admin login</h1>{error}
<form method="post" action="/login">
<div class="row"><input name="username" placeholder="Username" autocomplete="username" required></div>
<div class="row"><input name="password" type="password" placeholder="Password" autocomplete="current-password" required></div>
<button type="submit">Log in</button>
</form></body></html>"#
    )
}

/// JSON editor for the portfolio document plus a credential change form.
pub fn management_page() -> String {
    format!(
        r#"<!DOCTYPE html>
<html><head><meta charset="utf-8"><title>Portfolio admin</title><style>{STYLE}</style></head>
<body><h1>Portfolio admin</h1><p><a href="/logout">Log out</a></p>
<h2>Content</h2><p id="last-time"></p>
<textarea id="data" spellcheck="false"></textarea>
<div class="row"><button id="save">Save</button> <span id="status"></span></div>
<h2>Credentials</h2>
<div class="row"><input id="new-username" placeholder="New username"> <input id="new-password" type="password" placeholder="New password"> <button id="change">Change</button></div>
<script>
const status = (msg) => document.getElementById('status').textContent = msg;
async function load() {{
  const res = await fetch('/api/data');
  const doc = await res.json();
  document.getElementById('data').value = JSON.stringify(doc.data, null, 2);
  document.getElementById('last-time').textContent = doc.last_time ? 'Last saved ' + doc.last_time : 'Never saved';
}}
document.getElementById('save').onclick = async () => {{
  let data;
  try {{ data = JSON.parse(document.getElementById('data').value); }} catch (e) {{ return status('Invalid JSON: ' + e.message); }}
  const res = await fetch('/api/data', {{method: 'POST', headers: {{'Content-Type': 'application/json'}}, body: JSON.stringify({{data}})}});
  if (res.status === 401) return location.reload();
  const body = await res.json();
  status(res.ok ? 'Saved' : (body.details || body.error));
  if (res.ok) load();
}};
document.getElementById('change').onclick = async () => {{
  const username = document.getElementById('new-username').value;
  const password = document.getElementById('new-password').value;
  const res = await fetch('/api/change-password', {{method: 'POST', headers: {{'Content-Type': 'application/json'}}, body: JSON.stringify({{username, password}})}});
  if (res.status === 401) return location.reload();
  const body = await res.json();
  status(res.ok ? 'Credentials updated' : (body.details || body.error));
}};
load();
</script></body></html>"#
    )
}
