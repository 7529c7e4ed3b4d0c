use std::io::Cursor;
use std::path::{Path, PathBuf};

use chrono::Utc;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use super::date::{format_rfc822, rfc822};
use super::{write_atomic, xml_safe, ChannelMeta, Result};
use crate::domain::Item;

pub const LANGUAGE: &str = "zh-CN";
pub const ATOM_NS: &str = "http://www.w3.org/2005/Atom";
pub const CONTENT_NS: &str = "http://purl.org/rss/1.0/modules/content/";

/// Write an RSS 2.0 document for `items` to `path`, replacing any previous file.
pub fn generate<'a, I>(items: I, path: &Path, channel: &ChannelMeta) -> Result<PathBuf>
where
    I: IntoIterator<Item = &'a Item>,
{
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let self_link = format!("{}/{}", channel.link.trim_end_matches('/'), file_name);

    let xml = render(items, channel, &self_link)?;
    write_atomic(path, xml.as_bytes())?;

    tracing::info!(path = %path.display(), "Wrote feed");
    Ok(path.to_path_buf())
}

/// Render an RSS 2.0 document. `self_link` is the document's own URL.
pub fn render<'a, I>(items: I, channel: &ChannelMeta, self_link: &str) -> Result<String>
where
    I: IntoIterator<Item = &'a Item>,
{
    let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    writer.write_event(Event::Start(BytesStart::new("rss").with_attributes([
        ("version", "2.0"),
        ("xmlns:atom", ATOM_NS),
        ("xmlns:content", CONTENT_NS),
    ])))?;
    writer.write_event(Event::Start(BytesStart::new("channel")))?;

    text_element(&mut writer, "title", &channel.title)?;
    text_element(&mut writer, "link", &channel.link)?;
    text_element(&mut writer, "description", &channel.description)?;
    text_element(&mut writer, "language", LANGUAGE)?;
    text_element(&mut writer, "lastBuildDate", &format_rfc822(&Utc::now()))?;
    writer.write_event(Event::Empty(BytesStart::new("atom:link").with_attributes([
        ("href", &*xml_safe(self_link)),
        ("rel", "self"),
        ("type", "application/rss+xml"),
    ])))?;

    for item in items {
        write_item(&mut writer, item)?;
    }

    writer.write_event(Event::End(BytesEnd::new("channel")))?;
    writer.write_event(Event::End(BytesEnd::new("rss")))?;

    let mut xml = String::from_utf8_lossy(&writer.into_inner().into_inner()).into_owned();
    xml.push('\n');
    Ok(xml)
}

fn write_item(writer: &mut Writer<Cursor<Vec<u8>>>, item: &Item) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new("item")))?;

    text_element(writer, "title", &item.title)?;
    text_element(writer, "link", &item.link)?;

    if let Some(description) = item.description.as_deref().filter(|d| !d.is_empty()) {
        text_element(writer, "description", description)?;
    }
    if let Some(category) = item.category {
        text_element(writer, "category", category.label())?;
    }
    if let Some(pub_date) = item.pub_date.as_ref().and_then(rfc822) {
        text_element(writer, "pubDate", &pub_date)?;
    }

    writer.write_event(Event::Start(
        BytesStart::new("guid").with_attributes([("isPermaLink", "false")]),
    ))?;
    writer.write_event(Event::Text(BytesText::new(&xml_safe(item.guid()))))?;
    writer.write_event(Event::End(BytesEnd::new("guid")))?;

    if let Some(platform) = item.platform.as_deref().filter(|p| !p.is_empty()) {
        text_element(writer, "source", platform)?;
    }

    writer.write_event(Event::End(BytesEnd::new("item")))?;
    Ok(())
}

pub(crate) fn text_element(
    writer: &mut Writer<Cursor<Vec<u8>>>,
    name: &str,
    text: &str,
) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    writer.write_event(Event::Text(BytesText::new(&xml_safe(text))))?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Category, PubDate};

    fn sample_item() -> Item {
        Item {
            item_id: Some("vid-42".into()),
            title: "New AI Chip".into(),
            description: Some("Faster & <smaller>".into()),
            link: "https://example.com/ai-chip".into(),
            pub_date: Some(PubDate::from("2024-01-15T10:30:00Z")),
            platform: Some("youtube".into()),
            category: Some(Category::Tech),
        }
    }

    fn render_one(item: &Item) -> String {
        render([item], &ChannelMeta::default(), "https://localhost/feed.xml").unwrap()
    }

    #[test]
    fn test_channel_metadata() {
        let xml = render(&Vec::<Item>::new(), &ChannelMeta::default(), "https://localhost/feed.xml")
            .unwrap();
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(xml.contains("<rss version=\"2.0\""));
        assert!(xml.contains("xmlns:atom=\"http://www.w3.org/2005/Atom\""));
        assert!(xml.contains("<title>Universal RSS Feed</title>"));
        assert!(xml.contains("<language>zh-CN</language>"));
        assert!(xml.contains("<lastBuildDate>"));
        assert!(xml.contains(
            "<atom:link href=\"https://localhost/feed.xml\" rel=\"self\" type=\"application/rss+xml\"/>"
        ));
        assert!(!xml.contains("<item>"));
    }

    #[test]
    fn test_item_elements() {
        let xml = render_one(&sample_item());
        assert!(xml.contains("<title>New AI Chip</title>"));
        assert!(xml.contains("<link>https://example.com/ai-chip</link>"));
        assert!(xml.contains("<description>Faster &amp; &lt;smaller&gt;</description>"));
        assert!(xml.contains("<category>科技</category>"));
        assert!(xml.contains("<pubDate>Mon, 15 Jan 2024 10:30:00 +0000</pubDate>"));
        assert!(xml.contains("<guid isPermaLink=\"false\">vid-42</guid>"));
        assert!(xml.contains("<source>youtube</source>"));
    }

    #[test]
    fn test_two_space_indentation() {
        let xml = render_one(&sample_item());
        assert!(xml.contains("\n  <channel>"));
        assert!(xml.contains("\n    <title>Universal RSS Feed</title>"));
        assert!(xml.contains("\n      <title>New AI Chip</title>"));
    }

    #[test]
    fn test_optional_elements_omitted() {
        let mut item = Item::new("Bare", "https://example.com/bare");
        item.description = Some(String::new());
        item.platform = Some(String::new());
        let xml = render_one(&item);
        assert_eq!(xml.matches("<description>").count(), 1);
        assert!(!xml.contains("<category>"));
        assert!(!xml.contains("<pubDate>"));
        assert!(!xml.contains("<source>"));
        assert!(xml.contains("<guid isPermaLink=\"false\">https://example.com/bare</guid>"));
    }

    #[test]
    fn test_unparseable_date_is_omitted() {
        let mut item = sample_item();
        item.pub_date = Some(PubDate::from("not-a-date"));
        let xml = render_one(&item);
        assert!(!xml.contains("<pubDate>"));
        assert!(xml.contains("<title>New AI Chip</title>"));
    }

    #[test]
    fn test_generate_writes_file_with_self_link() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tech_feed.xml");
        let channel = ChannelMeta {
            link: "https://feeds.example.com/".into(),
            ..Default::default()
        };

        let written = generate(&[sample_item()], &path, &channel).unwrap();

        assert_eq!(written, path);
        let xml = std::fs::read_to_string(&path).unwrap();
        assert!(xml.contains("href=\"https://feeds.example.com/tech_feed.xml\""));
    }

    #[test]
    fn test_control_characters_are_stripped() {
        let mut item = Item::new("Bad\u{0008}title", "https://example.com/\u{001B}x");
        item.item_id = Some("id\u{0001}".into());
        item.description = Some("line\u{000C}feed\nkept".into());
        item.platform = Some("you\u{0007}tube".into());
        let xml = render_one(&item);

        assert!(!xml
            .chars()
            .any(|c| c < '\u{20}' && !matches!(c, '\t' | '\n' | '\r')));
        assert!(xml.contains("<title>Badtitle</title>"));
        assert!(xml.contains("<link>https://example.com/x</link>"));
        assert!(xml.contains("<description>linefeed\nkept</description>"));
        assert!(xml.contains("<guid isPermaLink=\"false\">id</guid>"));
        assert!(xml.contains("<source>youtube</source>"));

        let mut reader = quick_xml::Reader::from_str(&xml);
        reader.config_mut().check_end_names = true;
        let mut titles = Vec::new();
        let mut in_title = false;
        loop {
            match reader.read_event().unwrap() {
                Event::Start(e) if e.name().as_ref() == b"title" => in_title = true,
                Event::Text(t) if in_title => titles.push(t.unescape().unwrap().into_owned()),
                Event::End(e) if e.name().as_ref() == b"title" => in_title = false,
                Event::Eof => break,
                _ => {}
            }
        }
        assert_eq!(titles, vec!["Universal RSS Feed", "Badtitle"]);
    }

    #[test]
    fn test_generated_feed_parses() {
        let xml = render_one(&sample_item());
        let feed = feed_rs::parser::parse(xml.as_bytes()).unwrap();
        assert_eq!(feed.entries.len(), 1);
        let entry = &feed.entries[0];
        assert_eq!(entry.title.as_ref().unwrap().content, "New AI Chip");
        assert_eq!(entry.links[0].href, "https://example.com/ai-chip");
        assert!(entry.published.is_some());
    }
}
