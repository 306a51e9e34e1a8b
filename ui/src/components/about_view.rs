use dioxus::prelude::*;
use pulldown_cmark::{html, Options, Parser};

use shamba_common::site::page_title;

const ABOUT_MD: &str = include_str!("../../../docs/about.md");

#[derive(Clone, Debug, PartialEq)]
struct FaqEntry {
    question: String,
    answer_html: String,
}

fn markdown_to_html(source: &str) -> String {
    let mut opts = Options::empty();
    opts.insert(Options::ENABLE_TABLES);
    opts.insert(Options::ENABLE_STRIKETHROUGH);
    let mut out = String::new();
    html::push_html(&mut out, Parser::new_ext(source, opts));
    out
}

/// Split a markdown page on `## ` headings into an intro and a list of
/// collapsible questions.
fn parse_faq(source: &str) -> (String, Vec<FaqEntry>) {
    let mut intro = String::new();
    let mut entries = Vec::new();
    let mut question: Option<&str> = None;
    let mut answer = String::new();

    for line in source.lines() {
        if let Some(heading) = line.strip_prefix("## ") {
            if let Some(prev) = question.replace(heading.trim()) {
                entries.push(FaqEntry {
                    question: prev.to_string(),
                    answer_html: markdown_to_html(&answer),
                });
                answer.clear();
            }
            continue;
        }
        let target = if question.is_some() { &mut answer } else { &mut intro };
        target.push_str(line);
        target.push('\n');
    }
    if let Some(last) = question {
        entries.push(FaqEntry {
            question: last.to_string(),
            answer_html: markdown_to_html(&answer),
        });
    }

    (markdown_to_html(&intro), entries)
}

#[component]
pub fn AboutView() -> Element {
    let (intro_html, entries) = use_hook(|| parse_faq(ABOUT_MD));
    let mut open = use_signal::<Option<usize>>(|| None);
    let title = page_title(Some("About"));

    rsx! {
        document::Title { "{title}" }
        section { class: "about-view",
            div { class: "prose", dangerous_inner_html: "{intro_html}" }
            h2 { "Frequently asked questions" }
            for (i, entry) in entries.into_iter().enumerate() {
                div { key: "{i}", class: "faq-entry",
                    button {
                        class: "faq-question",
                        "aria-expanded": open() == Some(i),
                        onclick: move |_| {
                            let next = if open() == Some(i) { None } else { Some(i) };
                            open.set(next);
                        },
                        span { class: "faq-chevron",
                            if open() == Some(i) { "▾" } else { "▸" }
                        }
                        "{entry.question}"
                    }
                    if open() == Some(i) {
                        div { class: "faq-answer prose", dangerous_inner_html: "{entry.answer_html}" }
                    }
                }
            }
        }
    }
}
