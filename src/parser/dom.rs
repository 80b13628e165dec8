use scraper::ElementRef;

/// The slice of a parsed HTML tree the page walker needs: element name,
/// attributes, flattened text and element structure. Text nodes are never
/// handed out; callers see them only through [`DocNode::text_content`].
pub trait DocNode: Copy {
    fn tag_name(&self) -> &str;
    fn attribute(&self, name: &str) -> Option<&str>;
    fn has_class(&self, class: &str) -> bool;
    /// Concatenated text of this node and everything below it.
    fn text_content(&self) -> String;
    /// Direct element children in document order.
    fn element_children(&self) -> Vec<Self>;
    /// This element followed by all descendant elements, in document order.
    fn subtree(&self) -> Vec<Self>;

    fn find_all(&self, tag: &str) -> Vec<Self> {
        self.subtree()
            .into_iter()
            .filter(|n| n.tag_name() == tag)
            .collect()
    }
}

impl<'a> DocNode for ElementRef<'a> {
    fn tag_name(&self) -> &str {
        self.value().name()
    }

    fn attribute(&self, name: &str) -> Option<&str> {
        self.value().attr(name)
    }

    fn has_class(&self, class: &str) -> bool {
        self.value().classes().any(|c| c == class)
    }

    fn text_content(&self) -> String {
        self.text().collect()
    }

    fn element_children(&self) -> Vec<Self> {
        self.children().filter_map(ElementRef::wrap).collect()
    }

    fn subtree(&self) -> Vec<Self> {
        self.descendants().filter_map(ElementRef::wrap).collect()
    }
}
