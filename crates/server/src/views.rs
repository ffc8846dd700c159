//! HTML rendering for the status and admin pages. Deliberately plain: two
//! small server-rendered tables, no client-side code.

use chrono::Utc;

use service::registration::ProgramStatus;

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
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

fn page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n\
         <style>\n\
         body {{ font-family: sans-serif; margin: 2rem; }}\n\
         table {{ border-collapse: collapse; }}\n\
         td, th {{ border: 1px solid #ccc; padding: 0.3rem 0.7rem; text-align: left; }}\n\
         .full {{ color: #b00; font-weight: bold; }}\n\
         .ts {{ color: #777; font-size: 0.8rem; }}\n\
         form {{ display: inline; margin-right: 0.4rem; }}\n\
         </style>\n</head>\n<body>\n{body}\n<p class=\"ts\">generated {now} UTC</p>\n</body>\n</html>\n",
        title = escape(title),
        body = body,
        now = Utc::now().format("%Y-%m-%d %H:%M:%S"),
    )
}

fn state_cell(full: bool) -> &'static str {
    if full {
        "<span class=\"full\">FULL</span>"
    } else {
        "open"
    }
}

/// Public status page: program, count, limit, state.
pub fn status_page(rows: &[ProgramStatus]) -> String {
    let mut body = String::from(
        "<h1>Registration status</h1>\n<table>\n\
         <tr><th>Program</th><th>Registered</th><th>Limit</th><th>State</th></tr>\n",
    );
    for r in rows {
        let label = r.display_name.as_deref().unwrap_or(&r.id);
        body.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            escape(label),
            r.count,
            r.limit,
            state_cell(r.full),
        ));
    }
    body.push_str("</table>");
    page("Registration status", &body)
}

/// Admin management page: the status table plus adjustment forms. The key is
/// threaded through every form action so the next request stays authorized.
pub fn admin_page(rows: &[ProgramStatus], key: &str) -> String {
    let key = escape(key);
    let mut body = String::from(
        "<h1>Registration admin</h1>\n<table>\n\
         <tr><th>Program</th><th>Registered</th><th>Limit</th><th>State</th><th>Adjust</th></tr>\n",
    );
    for r in rows {
        let id = escape(&r.id);
        let label = r.display_name.as_deref().unwrap_or(&r.id);
        body.push_str(&format!(
            "<tr><td>{label} <code>({id})</code></td><td>{count}</td><td>{limit}</td><td>{state}</td><td>\
             <form method=\"post\" action=\"/admin/add/{id}?key={key}\"><button>+1</button></form>\
             <form method=\"post\" action=\"/admin/cancel/{id}?key={key}\"><button>-1</button></form>\
             <form method=\"post\" action=\"/admin/set/{id}?key={key}\">\
             <input name=\"newCount\" value=\"{count}\" size=\"4\"><button>set</button></form>\
             </td></tr>\n",
            label = escape(label),
            id = id,
            key = key,
            count = r.count,
            limit = r.limit,
            state = state_cell(r.full),
        ));
    }
    body.push_str("</table>");
    page("Registration admin", &body)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows() -> Vec<ProgramStatus> {
        vec![
            ProgramStatus {
                id: "week1".into(),
                display_name: Some("Week 1".into()),
                count: 5,
                limit: 5,
                full: true,
            },
            ProgramStatus {
                id: "week2".into(),
                display_name: None,
                count: 1,
                limit: 24,
                full: false,
            },
        ]
    }

    #[test]
    fn status_page_renders_rows_and_state() {
        let html = status_page(&rows());
        assert!(html.contains("Week 1"));
        assert!(html.contains("week2"));
        assert!(html.contains("FULL"));
        assert!(html.contains("open"));
    }

    #[test]
    fn admin_page_carries_key_in_form_actions() {
        let html = admin_page(&rows(), "sekrit");
        assert!(html.contains("/admin/add/week1?key=sekrit"));
        assert!(html.contains("/admin/cancel/week2?key=sekrit"));
        assert!(html.contains("name=\"newCount\""));
    }

    #[test]
    fn html_is_escaped() {
        let html = admin_page(
            &[ProgramStatus {
                id: "w".into(),
                display_name: Some("<script>x</script>".into()),
                count: 0,
                limit: 1,
                full: false,
            }],
            "a&b",
        );
        assert!(!html.contains("<script>x"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("key=a&amp;b"));
    }
}
