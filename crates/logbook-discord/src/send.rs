/// Discord caps messages at 2000 characters; stay under it with some headroom.
const CHUNK_MAX: usize = 1900;

/// Split a reply into sendable chunks, breaking on line boundaries.
///
/// Replies here are line-oriented (duty listings), so a line-accumulating
/// split keeps every duty entry intact. A single line longer than the cap is
/// hard-split as a last resort.
pub fn split_lines(text: &str) -> Vec<String> {
    if text.len() <= CHUNK_MAX {
        return vec![text.to_string()];
    }

    let mut chunks = Vec::new();
    let mut current = String::new();

    for line in text.split('\n') {
        if line.len() > CHUNK_MAX {
            if !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
            }
            let mut rest = line;
            while rest.len() > CHUNK_MAX {
                let (head, tail) = rest.split_at(CHUNK_MAX);
                chunks.push(head.to_string());
                rest = tail;
            }
            current.push_str(rest);
            continue;
        }

        if current.len() + line.len() + 1 > CHUNK_MAX {
            chunks.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push('\n');
        }
        current.push_str(line);
    }

    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

/// Send `text` to `channel_id`, splitting oversized replies.
pub async fn send_text(
    http: &serenity::http::Http,
    channel_id: serenity::model::id::ChannelId,
    text: &str,
) -> Result<(), serenity::Error> {
    for chunk in split_lines(text) {
        channel_id.say(http, &chunk).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_reply_is_one_chunk() {
        let chunks = split_lines("```Alice CLOCKED IN```");
        assert_eq!(chunks, vec!["```Alice CLOCKED IN```".to_string()]);
    }

    #[test]
    fn long_listing_splits_between_lines() {
        let line = format!("- Duty ID 1234 : 90 mins {}", "x".repeat(60));
        let text = vec![line.clone(); 40].join("\n");
        let chunks = split_lines(&text);

        assert!(chunks.len() >= 2);
        for chunk in &chunks {
            assert!(chunk.len() <= CHUNK_MAX);
            // No line was cut in half.
            for l in chunk.split('\n') {
                assert_eq!(l, line);
            }
        }
    }

    #[test]
    fn oversized_single_line_is_hard_split() {
        let text = "y".repeat(5000);
        let chunks = split_lines(&text);
        assert!(chunks.len() >= 3);
        assert!(chunks.iter().all(|c| c.len() <= CHUNK_MAX));
        assert_eq!(chunks.concat().len(), 5000);
    }
}
