//! Bookmarks shown on the start page, and the read-only folder tree handed
//! over by a browser or WebDAV provider.

use serde::{Deserialize, Serialize};

/// A start-page bookmark. The id never changes after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bookmark {
    pub id: String,
    #[serde(default)]
    pub icon: String,
    pub title: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// Fields of a bookmark before it has an id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewBookmark {
    pub icon: String,
    pub title: String,
    pub url: String,
    pub category: Option<String>,
}

impl NewBookmark {
    pub fn new(icon: impl Into<String>, title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            icon: icon.into(),
            title: title.into(),
            url: url.into(),
            category: None,
        }
    }

    pub(crate) fn with_id(self, id: String) -> Bookmark {
        Bookmark {
            id,
            icon: self.icon,
            title: self.title,
            url: self.url,
            category: self.category,
        }
    }
}

/// Partial edit of a bookmark. `None` leaves a field as it is; the id is not
/// editable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookmarkPatch {
    pub icon: Option<String>,
    pub title: Option<String>,
    pub url: Option<String>,
    /// `Some(None)` clears the category.
    pub category: Option<Option<String>>,
}

impl BookmarkPatch {
    pub(crate) fn apply(self, bookmark: &mut Bookmark) {
        if let Some(icon) = self.icon {
            bookmark.icon = icon;
        }
        if let Some(title) = self.title {
            bookmark.title = title;
        }
        if let Some(url) = self.url {
            bookmark.url = url;
        }
        if let Some(category) = self.category {
            bookmark.category = category;
        }
    }
}

/// The eight sample bookmarks a fresh profile starts with.
pub fn default_bookmarks() -> Vec<Bookmark> {
    [
        ("1", "🔍", "Google", "https://www.google.com"),
        ("2", "💻", "GitHub", "https://github.com"),
        ("3", "📺", "YouTube", "https://www.youtube.com"),
        ("4", "📧", "Gmail", "https://mail.google.com"),
        ("5", "📱", "B站", "https://www.bilibili.com"),
        ("6", "🎵", "网易云", "https://music.163.com"),
        ("7", "🛒", "淘宝", "https://www.taobao.com"),
        ("8", "📝", "Notion", "https://www.notion.so"),
    ]
    .into_iter()
    .map(|(id, icon, title, url)| Bookmark {
        id: id.to_string(),
        icon: icon.to_string(),
        title: title.to_string(),
        url: url.to_string(),
        category: None,
    })
    .collect()
}

/// A node of an external bookmark tree: a folder has children, a link has a
/// url. Trees come from browser APIs or XBEL files and cannot contain cycles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookmarkNode {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<BookmarkNode>>,
}

impl BookmarkNode {
    pub fn is_folder(&self) -> bool {
        self.children.is_some()
    }

    /// Every link url in this subtree, depth first, for "open all".
    pub fn collect_urls(&self) -> Vec<&str> {
        let mut urls = Vec::new();
        self.collect_into(&mut urls);
        urls
    }

    fn collect_into<'a>(&'a self, urls: &mut Vec<&'a str>) {
        if let Some(url) = &self.url {
            urls.push(url.as_str());
        }
        for child in self.children.iter().flatten() {
            child.collect_into(urls);
        }
    }

    /// Number of links in this subtree.
    pub fn link_count(&self) -> usize {
        usize::from(self.url.is_some())
            + self
                .children
                .iter()
                .flatten()
                .map(BookmarkNode::link_count)
                .sum::<usize>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link(id: &str, url: &str) -> BookmarkNode {
        BookmarkNode {
            id: id.to_string(),
            title: id.to_string(),
            url: Some(url.to_string()),
            children: None,
        }
    }

    #[test]
    fn test_default_bookmarks() {
        let bookmarks = default_bookmarks();
        assert_eq!(bookmarks.len(), 8);
        assert_eq!(bookmarks[0].title, "Google");
    }

    #[test]
    fn test_patch_keeps_untouched_fields() {
        let mut bookmark = default_bookmarks().remove(1);
        BookmarkPatch {
            title: Some("Code".to_string()),
            category: Some(Some("dev".to_string())),
            ..BookmarkPatch::default()
        }
        .apply(&mut bookmark);
        assert_eq!(bookmark.id, "2");
        assert_eq!(bookmark.title, "Code");
        assert_eq!(bookmark.url, "https://github.com");
        assert_eq!(bookmark.category.as_deref(), Some("dev"));
    }

    #[test]
    fn test_tree_urls() {
        let tree = BookmarkNode {
            id: "root".to_string(),
            title: "Bar".to_string(),
            url: None,
            children: Some(vec![
                link("a", "https://a.example"),
                BookmarkNode {
                    id: "f".to_string(),
                    title: "Folder".to_string(),
                    url: None,
                    children: Some(vec![link("b", "https://b.example")]),
                },
            ]),
        };
        assert!(tree.is_folder());
        assert_eq!(tree.collect_urls(), vec!["https://a.example", "https://b.example"]);
        assert_eq!(tree.link_count(), 2);
    }

    #[test]
    fn test_bookmark_without_icon_parses() {
        let bookmark: Bookmark =
            serde_json::from_str(r#"{"id":"9","title":"Rust","url":"https://rust-lang.org"}"#)
                .unwrap();
        assert_eq!(bookmark.icon, "");
        assert_eq!(bookmark.category, None);
    }
}
