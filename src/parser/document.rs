use scraper::{ElementRef, Html, Selector};

/// An immutable parsed HTML tree.
pub struct Document {
    html: Html,
}

/// A borrowed element inside a [`Document`].
#[derive(Clone, Copy)]
pub struct Node<'a> {
    element: ElementRef<'a>,
}

impl Document {
    pub(super) fn new(html: Html) -> Self {
        Self { html }
    }

    /// Every element matching `selector`, in document order.
    pub fn find_all<'a, 's>(&'a self, selector: &'s Selector) -> impl Iterator<Item = Node<'a>> + 's
    where
        'a: 's,
    {
        self.html.select(selector).map(|element| Node { element })
    }

    /// Leading slice of the serialized tree, for log output.
    pub fn preview(&self, limit: usize) -> String {
        self.html.root_element().html().chars().take(limit).collect()
    }

    pub fn parse_errors(&self) -> usize {
        self.html.errors.len()
    }
}

impl<'a> Node<'a> {
    /// First descendant matching `selector`. The node itself is not a candidate.
    pub fn find(&self, selector: &Selector) -> Option<Node<'a>> {
        self.element
            .select(selector)
            .next()
            .map(|element| Node { element })
    }

    /// Concatenation of every descendant text node.
    pub fn text(&self) -> String {
        self.element.text().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(html: &str) -> Document {
        Document::new(Html::parse_document(html))
    }

    fn sel(css: &str) -> Selector {
        Selector::parse(css).unwrap()
    }

    #[test]
    fn find_all_keeps_document_order() {
        let d = doc("<p class=a>1</p><div><p class=a>2</p></div><p class=a>3</p>");
        let texts: Vec<String> = d.find_all(&sel("p.a")).map(|n| n.text()).collect();
        assert_eq!(texts, ["1", "2", "3"]);
    }

    #[test]
    fn find_is_scoped_to_descendants() {
        let d = doc("<div id=x><span>in</span></div><span>out</span>");
        let div = d.find_all(&sel("#x")).next().unwrap();
        assert_eq!(div.find(&sel("span")).unwrap().text(), "in");

        let empty = doc("<div id=x></div><span>out</span>");
        let div = empty.find_all(&sel("#x")).next().unwrap();
        assert!(div.find(&sel("span")).is_none());
    }

    #[test]
    fn text_joins_nested_nodes() {
        let d = doc("<span>a <b>bold</b> move</span>");
        let span = d.find_all(&sel("span")).next().unwrap();
        assert_eq!(span.text(), "a bold move");
    }

    #[test]
    fn preview_is_truncated() {
        let d = doc("<html><body><p>hello</p></body></html>");
        assert_eq!(d.preview(6), "<html>");
        assert!(d.preview(10_000).contains("<p>hello</p>"));
    }
}
