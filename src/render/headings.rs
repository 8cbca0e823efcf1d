use std::{cell::RefCell, rc::Rc};

use lol_html::{RewriteStrSettings, element, rewrite_str, text};

const HEADING_LEVELS: [&str; 4] = ["h1", "h2", "h3", "h4"];

#[derive(Default)]
struct FirstHeading {
    seen: u32,
    text: String,
}

/// Removes, per heading level, the first heading whose text equals `title`.
///
/// Only the first `h1`..`h4` of each level is compared; later headings of the
/// same level are always kept.
pub fn strip_title_headings(html: &str, title: &str) -> anyhow::Result<String> {
    let first_headings = collect_first_headings(html)?;
    let matched: Vec<bool> = first_headings
        .iter()
        .map(|heading| heading.seen > 0 && normalize_heading_text(&heading.text) == title)
        .collect();
    if !matched.contains(&true) {
        return Ok(html.to_owned());
    }

    let mut handlers = Vec::new();
    for (level, remove) in HEADING_LEVELS.iter().zip(matched) {
        if !remove {
            continue;
        }
        let mut seen = 0u32;
        handlers.push(element!(*level, move |el| {
            seen += 1;
            if seen == 1 {
                el.remove();
            }
            Ok(())
        }));
    }

    rewrite_str(
        html,
        RewriteStrSettings {
            element_content_handlers: handlers,
            ..RewriteStrSettings::default()
        },
    )
    .map_err(|err| anyhow::anyhow!("remove duplicate heading: {err}"))
}

fn collect_first_headings(html: &str) -> anyhow::Result<Vec<FirstHeading>> {
    let state: Rc<RefCell<Vec<FirstHeading>>> = Rc::new(RefCell::new(
        HEADING_LEVELS.iter().map(|_| FirstHeading::default()).collect(),
    ));

    let mut handlers = Vec::new();
    for (idx, level) in HEADING_LEVELS.iter().enumerate() {
        handlers.push(element!(*level, {
            let state = Rc::clone(&state);
            move |_el| {
                let mut state = state.borrow_mut();
                state[idx].seen = state[idx].seen.saturating_add(1);
                Ok(())
            }
        }));
        handlers.push(text!(*level, {
            let state = Rc::clone(&state);
            move |chunk| {
                let mut state = state.borrow_mut();
                if state[idx].seen == 1 {
                    state[idx].text.push_str(chunk.as_str());
                }
                Ok(())
            }
        }));
    }

    rewrite_str(
        html,
        RewriteStrSettings {
            element_content_handlers: handlers,
            ..RewriteStrSettings::default()
        },
    )
    .map_err(|err| anyhow::anyhow!("scan headings: {err}"))?;

    let headings = state.take();
    Ok(headings)
}

fn normalize_heading_text(raw: &str) -> String {
    html_escape::decode_html_entities(raw)
        .replace('\n', " ")
        .replace("  ", " ")
        .trim()
        .to_owned()
}
