use std::fmt;

use serde::Serialize;

// ---------------------------------------------------------------------------
// Setting values
// ---------------------------------------------------------------------------

/// The value held by a leaf setting.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum SettingValue {
    Text(String),
    Float(f64),
    Int(i64),
    Bool(bool),
    /// Reference to one dataset by name.
    Dataset(String),
    /// References to several datasets by name.
    Datasets(Vec<String>),
}

impl SettingValue {
    /// Rewrite dataset references equal to `before`. Returns how many changed.
    fn replace_dataset(&mut self, before: &str, after: &str) -> usize {
        match self {
            SettingValue::Dataset(name) if name == before => {
                *name = after.to_string();
                1
            }
            SettingValue::Datasets(names) => {
                let mut changed = 0;
                for name in names.iter_mut().filter(|n| n.as_str() == before) {
                    *name = after.to_string();
                    changed += 1;
                }
                changed
            }
            _ => 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Setting {
    pub name: String,
    pub value: SettingValue,
}

/// A node in a widget's settings tree: either a named group of further
/// nodes, or a single setting.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SettingNode {
    Group { name: String, children: Vec<SettingNode> },
    Leaf(Setting),
}

impl SettingNode {
    pub fn leaf(name: &str, value: SettingValue) -> Self {
        SettingNode::Leaf(Setting {
            name: name.to_string(),
            value,
        })
    }

    pub fn group(name: &str, children: Vec<SettingNode>) -> Self {
        SettingNode::Group {
            name: name.to_string(),
            children,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            SettingNode::Group { name, .. } => name,
            SettingNode::Leaf(setting) => &setting.name,
        }
    }

    fn replace_dataset(&mut self, before: &str, after: &str) -> usize {
        match self {
            SettingNode::Group { children, .. } => children
                .iter_mut()
                .map(|child| child.replace_dataset(before, after))
                .sum(),
            SettingNode::Leaf(setting) => setting.value.replace_dataset(before, after),
        }
    }
}

// ---------------------------------------------------------------------------
// Widgets
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WidgetKind {
    Document,
    Page,
    Graph,
    Axis,
    Xy,
    Function,
    Label,
    Other(String),
}

impl WidgetKind {
    /// Type name, also the stem of automatically chosen widget names.
    pub fn type_name(&self) -> &str {
        match self {
            WidgetKind::Document => "document",
            WidgetKind::Page => "page",
            WidgetKind::Graph => "graph",
            WidgetKind::Axis => "axis",
            WidgetKind::Xy => "xy",
            WidgetKind::Function => "function",
            WidgetKind::Label => "label",
            WidgetKind::Other(name) => name,
        }
    }
}

impl fmt::Display for WidgetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// One widget and, recursively, everything below it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Widget {
    pub name: String,
    pub kind: WidgetKind,
    pub settings: Vec<SettingNode>,
    pub children: Vec<Widget>,
}

impl Widget {
    pub fn new(name: &str, kind: WidgetKind) -> Self {
        Widget {
            name: name.to_string(),
            kind,
            settings: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_setting(mut self, name: &str, value: SettingValue) -> Self {
        self.set(name, value);
        self
    }

    pub fn with_group(mut self, name: &str, children: Vec<SettingNode>) -> Self {
        self.settings.push(SettingNode::group(name, children));
        self
    }

    /// Set a top-level leaf setting, replacing any node of the same name.
    pub fn set(&mut self, name: &str, value: SettingValue) {
        let node = SettingNode::leaf(name, value);
        match self.settings.iter_mut().find(|n| n.name() == name) {
            Some(existing) => *existing = node,
            None => self.settings.push(node),
        }
    }

    /// Look up a leaf by slash-separated path through setting groups,
    /// e.g. `"Line/color"`.
    pub fn setting(&self, path: &str) -> Option<&SettingValue> {
        let mut nodes = &self.settings;
        let mut parts = path.split('/').peekable();
        while let Some(part) = parts.next() {
            let node = nodes.iter().find(|n| n.name() == part)?;
            match (node, parts.peek()) {
                (SettingNode::Leaf(setting), None) => return Some(&setting.value),
                (SettingNode::Group { children, .. }, Some(_)) => nodes = children,
                _ => return None,
            }
        }
        None
    }

    pub fn child(&self, name: &str) -> Option<&Widget> {
        self.children.iter().find(|w| w.name == name)
    }

    /// Find a descendant by absolute path such as `/page1/graph1`. `/` is this widget.
    pub fn find(&self, path: &str) -> Option<&Widget> {
        path_parts(path).try_fold(self, |w, part| w.child(part))
    }

    pub fn find_mut(&mut self, path: &str) -> Option<&mut Widget> {
        path_parts(path).try_fold(self, |w, part| {
            w.children.iter_mut().find(|c| c.name == part)
        })
    }

    /// `base` if no child uses it yet, otherwise `base2`, `base3`, ...
    pub fn unique_child_name(&self, base: &str) -> String {
        if self.child(base).is_none() {
            return base.to_string();
        }
        (2..)
            .map(|n| format!("{base}{n}"))
            .find(|candidate| self.child(candidate).is_none())
            .unwrap_or_else(|| base.to_string())
    }

    /// Lowest free automatic name for a child of this kind: `graph1`, `graph2`, ...
    pub fn auto_child_name(&self, kind: &WidgetKind) -> String {
        (1..)
            .map(|n| format!("{}{n}", kind.type_name()))
            .find(|candidate| self.child(candidate).is_none())
            .unwrap_or_else(|| kind.type_name().to_string())
    }

    /// Append a new child with an automatic name and return it.
    pub fn add(&mut self, kind: WidgetKind) -> &mut Widget {
        let name = self.auto_child_name(&kind);
        self.add_child(Widget::new(&name, kind))
    }

    /// Append `widget` as the last child and return it.
    pub fn add_child(&mut self, widget: Widget) -> &mut Widget {
        self.children.push(widget);
        let last = self.children.len() - 1;
        &mut self.children[last]
    }

    /// Rewrite every dataset reference equal to `before` in this widget's
    /// settings and in all descendants. Returns the number of references changed.
    pub fn replace_dataset(&mut self, before: &str, after: &str) -> usize {
        let own: usize = self
            .settings
            .iter_mut()
            .map(|node| node.replace_dataset(before, after))
            .sum();
        let below: usize = self
            .children
            .iter_mut()
            .map(|child| child.replace_dataset(before, after))
            .sum();
        own + below
    }
}

fn path_parts(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|p| !p.is_empty())
}

/// Split `/a/b/c` into (`/a/b`, `c`). Returns `None` for the root path.
pub fn split_path(path: &str) -> Option<(String, &str)> {
    let parts: Vec<&str> = path_parts(path).collect();
    let (last, parents) = parts.split_last()?;
    Some((format!("/{}", parents.join("/")), last))
}
