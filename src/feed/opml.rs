use std::io::Cursor;
use std::path::{Path, PathBuf};

use chrono::Utc;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::Writer;

use super::date::format_rfc822;
use super::rss::text_element;
use super::{write_atomic, xml_safe, Result};
use crate::domain::Subscription;

pub const DEFAULT_TITLE: &str = "Universal RSS Subscriptions";
pub const DEFAULT_FILE_NAME: &str = "subscriptions.opml";

/// Write an OPML 2.0 subscription list to `path`, replacing any previous file.
pub fn generate_opml(subscriptions: &[Subscription], path: &Path, title: &str) -> Result<PathBuf> {
    let xml = render(subscriptions, title)?;
    write_atomic(path, xml.as_bytes())?;

    tracing::info!(path = %path.display(), count = subscriptions.len(), "Wrote OPML");
    Ok(path.to_path_buf())
}

/// Render subscriptions as OPML, one outline per platform holding one leaf
/// per subscription.
pub fn render(subscriptions: &[Subscription], title: &str) -> Result<String> {
    let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    writer.write_event(Event::Start(
        BytesStart::new("opml").with_attributes([("version", "2.0")]),
    ))?;

    writer.write_event(Event::Start(BytesStart::new("head")))?;
    text_element(&mut writer, "title", title)?;
    text_element(&mut writer, "dateCreated", &format_rfc822(&Utc::now()))?;
    writer.write_event(Event::End(BytesEnd::new("head")))?;

    writer.write_event(Event::Start(BytesStart::new("body")))?;
    for (platform, subs) in group_by_platform(subscriptions) {
        let name = title_case(&xml_safe(platform));
        writer.write_event(Event::Start(BytesStart::new("outline").with_attributes([
            ("text", name.as_str()),
            ("title", name.as_str()),
        ])))?;
        for sub in subs {
            let label = xml_safe(sub.display_title());
            let url = xml_safe(&sub.url);
            writer.write_event(Event::Empty(BytesStart::new("outline").with_attributes([
                ("type", "rss"),
                ("text", &*label),
                ("title", &*label),
                ("xmlUrl", &*url),
                ("htmlUrl", &*url),
            ])))?;
        }
        writer.write_event(Event::End(BytesEnd::new("outline")))?;
    }
    writer.write_event(Event::End(BytesEnd::new("body")))?;
    writer.write_event(Event::End(BytesEnd::new("opml")))?;

    let mut xml = String::from_utf8_lossy(&writer.into_inner().into_inner()).into_owned();
    xml.push('\n');
    Ok(xml)
}

/// Group by platform, keeping platforms in first-seen order.
pub fn group_by_platform(subscriptions: &[Subscription]) -> Vec<(&str, Vec<&Subscription>)> {
    let mut groups: Vec<(&str, Vec<&Subscription>)> = Vec::new();
    for sub in subscriptions {
        let platform = sub.platform_key();
        match groups.iter_mut().find(|(p, _)| *p == platform) {
            Some((_, subs)) => subs.push(sub),
            None => groups.push((platform, vec![sub])),
        }
    }
    groups
}

/// Upper-case the first letter of every alphabetic run, lower-case the rest.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_word = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sub(url: &str, title: Option<&str>, platform: Option<&str>) -> Subscription {
        let mut s = Subscription::new(url);
        s.title = title.map(String::from);
        s.platform = platform.map(String::from);
        s
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("bilibili"), "Bilibili");
        assert_eq!(title_case("YOUTUBE"), "Youtube");
        assert_eq!(title_case("hacker news"), "Hacker News");
        assert_eq!(title_case("x-twitter"), "X-Twitter");
        assert_eq!(title_case("小红书"), "小红书");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn test_group_preserves_first_seen_order() {
        let subs = vec![
            sub("https://a", None, Some("youtube")),
            sub("https://b", None, Some("bilibili")),
            sub("https://c", None, Some("youtube")),
            sub("https://d", None, None),
        ];
        let groups = group_by_platform(&subs);
        let names: Vec<_> = groups.iter().map(|(p, _)| *p).collect();
        assert_eq!(names, vec!["youtube", "bilibili", "other"]);
        assert_eq!(groups[0].1.len(), 2);
    }

    #[test]
    fn test_render_structure() {
        let subs = vec![
            sub("https://example.com/rss", Some("Example & Co"), Some("blog")),
            sub("https://untitled.com/rss", None, Some("blog")),
        ];
        let xml = render(&subs, DEFAULT_TITLE).unwrap();

        assert!(xml.contains("<opml version=\"2.0\">"));
        assert!(xml.contains("<title>Universal RSS Subscriptions</title>"));
        assert!(xml.contains("<dateCreated>"));
        assert!(xml.contains("<outline text=\"Blog\" title=\"Blog\">"));
        assert!(xml.contains(
            "<outline type=\"rss\" text=\"Example &amp; Co\" title=\"Example &amp; Co\" \
             xmlUrl=\"https://example.com/rss\" htmlUrl=\"https://example.com/rss\"/>"
        ));
        assert!(xml.contains("text=\"https://untitled.com/rss\" title=\"https://untitled.com/rss\""));
    }

    #[test]
    fn test_render_strips_control_characters() {
        let subs = vec![sub(
            "https://example.com/\u{0002}rss",
            Some("Noisy\u{0008} title"),
            Some("blog\u{001F}"),
        )];
        let xml = render(&subs, "Subs\u{0000}").unwrap();

        assert!(!xml
            .chars()
            .any(|c| c < '\u{20}' && !matches!(c, '\t' | '\n' | '\r')));
        assert!(xml.contains("<title>Subs</title>"));
        assert!(xml.contains("<outline text=\"Blog\" title=\"Blog\">"));
        assert!(xml.contains("text=\"Noisy title\""));
        assert!(xml.contains("xmlUrl=\"https://example.com/rss\""));
    }

    #[test]
    fn test_render_empty_list() {
        let xml = render(&[], "Empty").unwrap();
        assert!(xml.contains("<title>Empty</title>"));
        assert!(!xml.contains("<outline"));
    }

    #[test]
    fn test_generate_opml_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_FILE_NAME);
        let written = generate_opml(&[sub("https://a", None, None)], &path, DEFAULT_TITLE).unwrap();
        assert_eq!(written, path);
        assert!(std::fs::read_to_string(&path).unwrap().contains("<outline text=\"Other\""));
    }
}
