//! Embedded HTML templates for the browser-facing views.
//!
//! Templates are `&str` constants rendered via minijinja. Names end in
//! `.html` so query-derived values are auto-escaped.

/// Base layout template. All pages extend this.
pub const LAYOUT: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>{% block title %}Bloocube{% endblock %} - Bloocube</title>
    <style>
        :root {
            --bg: #f5f7fb;
            --card: #ffffff;
            --border: #dfe3ee;
            --text: #1c2333;
            --muted: #6b7385;
            --accent: #2563eb;
            --danger: #dc2626;
            --radius: 8px;
        }
        *, *::before, *::after { box-sizing: border-box; margin: 0; padding: 0; }
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            background: var(--bg);
            color: var(--text);
            line-height: 1.6;
        }
        a { color: var(--accent); text-decoration: none; }
        .container { max-width: 640px; margin: 3rem auto; padding: 0 1rem; }
        .card {
            background: var(--card);
            border: 1px solid var(--border);
            border-radius: var(--radius);
            padding: 1.5rem;
        }
        .alert {
            border: 1px solid var(--danger);
            color: var(--danger);
            border-radius: var(--radius);
            padding: 0.75rem 1rem;
            margin-bottom: 1rem;
        }
        .muted { color: var(--muted); font-size: 0.875rem; }
        .provider {
            display: flex;
            justify-content: space-between;
            align-items: center;
            padding: 0.75rem 0;
            border-bottom: 1px solid var(--border);
        }
        .provider:last-child { border-bottom: none; }
        .btn {
            display: inline-block;
            background: var(--accent);
            color: #fff;
            border-radius: var(--radius);
            padding: 0.4rem 0.9rem;
            font-size: 0.875rem;
        }
        .btn[aria-disabled="true"] { background: var(--muted); pointer-events: none; }
    </style>
</head>
<body>
    <div class="container">
        <h1 style="font-size:1.5rem;margin-bottom:1rem;">
            <span style="color:var(--accent);">bloocube</span>
        </h1>
        {% block body %}{% endblock %}
    </div>
</body>
</html>"#;

/// Login view. Sign-in itself happens against the backend; this view only
/// tells the user why they landed here and where they will resume.
pub const LOGIN: &str = r#"{% extends "layout.html" %}
{% block title %}Sign in{% endblock %}
{% block body %}
<div class="card">
    <h2 style="font-size:1.125rem;margin-bottom:0.5rem;">Sign in required</h2>
    <p class="muted">Connecting a social account needs a Bloocube session.</p>
    {% if next %}
    <p class="muted" style="margin-top:1rem;">
        After signing in you will continue at <code id="next">{{ next }}</code>.
    </p>
    {% endif %}
</div>
{% endblock %}"#;

/// Settings view listing linkable providers, with the last handshake
/// message if any.
pub const SETTINGS: &str = r#"{% extends "layout.html" %}
{% block title %}Connected accounts{% endblock %}
{% block body %}
{% if message %}
<div class="alert" role="alert" id="message">{{ message }}</div>
{% endif %}
<div class="card">
    <h2 style="font-size:1.125rem;margin-bottom:0.5rem;">Connected accounts</h2>
    {% for p in providers %}
    <div class="provider">
        <div>
            <strong>{{ p.name }}</strong>
            {% if not p.configured %}<span class="muted"> (not configured)</span>{% endif %}
        </div>
        <a class="btn" href="{{ p.connect_url }}"{% if not p.configured %} aria-disabled="true"{% endif %}>Connect</a>
    </div>
    {% endfor %}
</div>
{% endblock %}"#;
