use crate::article::{ArticleInfo, ArticleResponse, Case, ExampleInfo, TranslationsInfo};

pub const NO_INFORMATION: &str = "❌ No information found for this word.";

const INTERPRETATION_SEPARATOR: &str = "\n\n──────────\n\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    /// Compact JSON.
    Api,
    /// Pretty-printed JSON.
    Console,
    /// Telegram HTML markup.
    Chat,
}

pub fn render(response: &ArticleResponse, channel: Channel) -> serde_json::Result<String> {
    match channel {
        Channel::Api => serde_json::to_string(response),
        Channel::Console => serde_json::to_string_pretty(response),
        Channel::Chat => Ok(to_chat_html(response)),
    }
}

/// The chat rendering cut into messages of at most `limit` characters.
/// Interpretations are packed whole where they fit; an interpretation longer
/// than `limit` is cut between its paragraphs.
pub fn to_chat_messages(response: &ArticleResponse, limit: usize) -> Vec<String> {
    match response {
        ArticleResponse::Success { data } if !data.is_empty() => pack(
            data.iter().flat_map(|info| {
                let text = render_info(info);
                if text.chars().count() <= limit {
                    vec![text]
                } else {
                    pack(text.split("\n\n").map(str::to_string), "\n\n", limit)
                }
            }),
            INTERPRETATION_SEPARATOR,
            limit,
        ),
        _ => vec![to_chat_html(response)],
    }
}

fn pack(pieces: impl IntoIterator<Item = String>, separator: &str, limit: usize) -> Vec<String> {
    let mut messages = Vec::new();
    let mut current = String::new();
    for piece in pieces {
        if current.is_empty() {
            current = piece;
        } else if current.chars().count() + separator.chars().count() + piece.chars().count()
            <= limit
        {
            current.push_str(separator);
            current.push_str(&piece);
        } else {
            messages.push(std::mem::replace(&mut current, piece));
        }
    }
    if !current.is_empty() {
        messages.push(current);
    }
    messages
}

/// Human-readable message for the chat bot.
pub fn to_chat_html(response: &ArticleResponse) -> String {
    match response {
        ArticleResponse::Failure { message } => {
            format!("❌ <b>Error:</b> {}", escape_html(message))
        }
        ArticleResponse::Success { data } if data.is_empty() => NO_INFORMATION.to_string(),
        ArticleResponse::Success { data } => data
            .iter()
            .map(render_info)
            .collect::<Vec<String>>()
            .join(INTERPRETATION_SEPARATOR),
    }
}

fn render_info(info: &ArticleInfo) -> String {
    let mut sections = vec![format!(
        "🇩🇪 <b>{}</b>\n📖 <i>{}</i>",
        escape_html(&info.word_with_article),
        escape_html(&info.translation)
    )];
    for (number, example) in info.example.numbers() {
        let mut block = format!("📝 <b>{} Examples:</b>", number.label());
        let groups = case_groups(example);
        if !groups.is_empty() {
            block.push('\n');
            block.push_str(&groups.join("\n\n"));
        }
        sections.push(block);
    }
    sections.join("\n\n")
}

/// One group of lines per case that has at least one complete pair.
fn case_groups(example: &ExampleInfo) -> Vec<String> {
    Case::ALL
        .iter()
        .filter_map(|&case| {
            let lines: Vec<String> = [
                ("Definite", &example.definite),
                ("Indefinite", &example.indefinite),
            ]
            .into_iter()
            .filter_map(|(kind, translations)| case_line(case, kind, translations))
            .collect();
            (!lines.is_empty()).then(|| lines.join("\n"))
        })
        .collect()
}

fn case_line(case: Case, kind: &str, translations: &TranslationsInfo) -> Option<String> {
    let (example, translation) = translations.present(case)?;
    Some(format!(
        "• <b>{} {}:</b> {} / <i>{}</i>",
        case.label(),
        kind,
        escape_html(example),
        escape_html(translation)
    ))
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            other => escaped.push(other),
        }
    }
    escaped
}
