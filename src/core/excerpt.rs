// 收合卡片的摘要推導：把 HTML 內文剝成純文字再截到固定字數。
// 剝除器對壞掉的標記有定義好的行為：解析不了的片段照原樣輸出，永不失敗。

pub const EXCERPT_MAX_CHARS: usize = 50;
pub const EMPTY_CONTENT_PLACEHOLDER: &str = "No content";

/// 收合視圖顯示的文字：後端給的非空 excerpt 優先，否則從內文推導
pub fn collapsed_excerpt(server_excerpt: Option<&str>, content_html: &str) -> String {
    match server_excerpt {
        Some(excerpt) if !excerpt.is_empty() => excerpt.to_string(),
        _ => derive_excerpt(content_html),
    }
}

/// 從 HTML 內文推導摘要：剝標記、截 50 字（以字元計）、截斷才補刪節號
pub fn derive_excerpt(content_html: &str) -> String {
    if content_html.is_empty() {
        return EMPTY_CONTENT_PLACEHOLDER.to_string();
    }
    truncate_chars(&strip_html(content_html), EXCERPT_MAX_CHARS)
}

/// 移除標籤與註解、解碼常見實體。`<` 後面接 ASCII 字母、`/`、`!`、`?` 才算開標籤，
/// 其他的 `<` 是字面文字；結尾沒關閉的標籤也照原樣輸出。
pub fn strip_html(html: &str) -> String {
    let mut text = String::with_capacity(html.len());
    let mut rest = html;

    while let Some(open) = rest.find('<') {
        text.push_str(&rest[..open]);
        let tail = &rest[open..];

        // 註解整段跳過，沒關閉就吃到結尾
        if let Some(after_comment) = skip_comment(tail) {
            rest = after_comment;
            continue;
        }

        if opens_tag(tail) {
            match tail.find('>') {
                Some(close) => rest = &tail[close + 1..],
                None => {
                    text.push_str(tail);
                    rest = "";
                }
            }
        } else {
            text.push('<');
            rest = &tail[1..];
        }
    }
    text.push_str(rest);

    decode_entities(&text)
}

fn skip_comment(tail: &str) -> Option<&str> {
    let body = tail.strip_prefix("<!--")?;
    match body.find("-->") {
        Some(end) => Some(&body[end + 3..]),
        None => Some(""),
    }
}

fn opens_tag(tail: &str) -> bool {
    matches!(
        tail[1..].chars().next(),
        Some(c) if c.is_ascii_alphabetic() || c == '/' || c == '!' || c == '?'
    )
}

fn decode_entities(text: &str) -> String {
    let mut decoded = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(amp) = rest.find('&') {
        decoded.push_str(&rest[..amp]);
        let tail = &rest[amp..];

        match entity_at(tail) {
            Some((ch, consumed)) => {
                decoded.push(ch);
                rest = &tail[consumed..];
            }
            None => {
                decoded.push('&');
                rest = &tail[1..];
            }
        }
    }
    decoded.push_str(rest);
    decoded
}

fn entity_at(tail: &str) -> Option<(char, usize)> {
    let semi = tail[1..].find(';')?;
    let name = &tail[1..1 + semi];
    // 實體名最長到 "#x10FFFF"，超過就當字面文字
    if name.is_empty() || name.len() > 8 {
        return None;
    }
    let ch = match name {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => '\u{a0}',
        _ => decode_numeric(name)?,
    };
    Some((ch, semi + 2))
}

fn decode_numeric(name: &str) -> Option<char> {
    let digits = name.strip_prefix('#')?;
    let code = if let Some(hex) = digits.strip_prefix('x').or_else(|| digits.strip_prefix('X')) {
        u32::from_str_radix(hex, 16).ok()?
    } else {
        digits.parse::<u32>().ok()?
    };
    char::from_u32(code)
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    for (count, (idx, _)) in text.char_indices().enumerate() {
        if count == max_chars {
            return format!("{}...", &text[..idx]);
        }
    }
    text.to_string()
}
