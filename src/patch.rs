//! Property-preserving element patcher.
//!
//! Every entity in the package reads and writes a known subset of its
//! element's fields. A field lives either as an attribute or as a child of a
//! declared "property group" container (e.g. `<Properties>`), and the
//! original placement must survive re-serialization. [`patch`] merges a set
//! of logical field edits over the original element, reproducing everything
//! it does not understand: unknown attributes, unknown property children,
//! property element attributes, and `type="list"` sub-structure.

use std::collections::HashSet;

use crate::xml::{Element, Node};

/// Property children too complex to flatten into field descriptors. Callers
/// manage these explicitly and re-inject them through `extra_children`.
const COMPLEX_PROPERTIES: &[&str] = &["PathGeometry"];

/// How the element being patched is identified.
pub enum Identity<'a> {
    /// No original element: the patch authors a new element from the edits.
    None,
    /// The original element itself (an owned snapshot held by the entity).
    Element(&'a Element),
    /// Look the original up by its `Self` attribute inside `root`.
    Id { root: &'a Element, id: &'a str },
}

/// Ordered set of field edits. A `None` value keeps the original value (the
/// key still participates in the union); a `Some` value overrides it.
#[derive(Default)]
pub struct Edits {
    entries: Vec<(String, Option<String>)>,
}

impl Edits {
    pub fn new() -> Self {
        Edits::default()
    }

    pub fn set(mut self, key: &str, value: impl IntoEdit) -> Self {
        self.entries.push((key.to_string(), value.into_edit()));
        self
    }

    fn value(&self, key: &str) -> Option<&Option<String>> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }
}

/// Conversion of entity field types into the string form edits carry.
pub trait IntoEdit {
    fn into_edit(self) -> Option<String>;
}

impl IntoEdit for Option<String> {
    fn into_edit(self) -> Option<String> {
        self
    }
}

impl IntoEdit for Option<&str> {
    fn into_edit(self) -> Option<String> {
        self.map(str::to_string)
    }
}

impl IntoEdit for String {
    fn into_edit(self) -> Option<String> {
        Some(self)
    }
}

impl IntoEdit for &str {
    fn into_edit(self) -> Option<String> {
        Some(self.to_string())
    }
}

impl IntoEdit for f64 {
    fn into_edit(self) -> Option<String> {
        Some(crate::util::fmt_number(self))
    }
}

impl IntoEdit for Option<f64> {
    fn into_edit(self) -> Option<String> {
        self.map(crate::util::fmt_number)
    }
}

impl IntoEdit for bool {
    fn into_edit(self) -> Option<String> {
        Some(self.to_string())
    }
}

impl IntoEdit for Option<bool> {
    fn into_edit(self) -> Option<String> {
        self.map(|b| b.to_string())
    }
}

impl IntoEdit for usize {
    fn into_edit(self) -> Option<String> {
        Some(self.to_string())
    }
}

impl IntoEdit for Option<usize> {
    fn into_edit(self) -> Option<String> {
        self.map(|v| v.to_string())
    }
}

struct Field {
    key: String,
    source: Source,
}

enum Source {
    Attribute(String),
    Property {
        group: String,
        attrs: Vec<(String, String)>,
        value: PropertyValue,
    },
}

enum PropertyValue {
    Text(String),
    List(Vec<ListItem>),
}

struct ListItem {
    attrs: Vec<(String, String)>,
    value: String,
}

/// Produce a new element that merges `edits` over the original identified by
/// `identity`.
///
/// Fields untouched by the edits reproduce their original value and
/// placement; fields absent from both the original and the edits are
/// omitted, never emitted empty. Keys with no original record default to
/// attribute placement. `extra_children` (e.g. a rebuilt geometry block) are
/// appended after the property groups.
pub fn patch(
    tag: &str,
    edits: &Edits,
    identity: Identity<'_>,
    property_groups: &[&str],
    extra_children: Vec<Node>,
) -> Element {
    let original = match identity {
        Identity::None => None,
        Identity::Element(el) => Some(el),
        Identity::Id { root, id } => root.find_by_id(tag, id),
    };

    let fields = original
        .map(|el| collect_fields(el, property_groups))
        .unwrap_or_default();

    // The identity id always wins over whatever Self the original carried.
    let implicit_self = match identity {
        Identity::Id { id, .. } => Some(id.to_string()),
        _ => None,
    };

    // Union of keys: original order first, then edit-only keys in edit order.
    let mut keys: Vec<String> = fields.iter().map(|f| f.key.clone()).collect();
    if implicit_self.is_some() && !keys.iter().any(|k| k == "Self") {
        keys.insert(0, "Self".to_string());
    }
    for (key, _) in &edits.entries {
        if !keys.iter().any(|k| k == key) {
            keys.push(key.clone());
        }
    }

    // Property groups in order of first appearance among the original fields.
    let mut group_order: Vec<&str> = Vec::new();
    for field in &fields {
        if let Source::Property { group, .. } = &field.source
            && !group_order.contains(&group.as_str())
        {
            group_order.push(group);
        }
    }

    let grouped_keys: HashSet<&str> = fields
        .iter()
        .filter(|f| matches!(f.source, Source::Property { .. }))
        .map(|f| f.key.as_str())
        .collect();

    let mut element = Element::new(tag);

    // Attributes: every union key that does not live in a property group.
    for key in &keys {
        if grouped_keys.contains(key.as_str()) {
            continue;
        }
        let value = if key == "Self" && implicit_self.is_some() {
            implicit_self.clone()
        } else {
            match edits.value(key) {
                Some(Some(v)) => Some(v.clone()),
                _ => fields.iter().find(|f| &f.key == key).and_then(|f| {
                    match &f.source {
                        Source::Attribute(v) => Some(v.clone()),
                        Source::Property { .. } => None,
                    }
                }),
            }
        };
        if let Some(value) = value {
            element.attrs.push((key.clone(), value));
        }
    }

    // Self leads, matching how the format writes identity.
    if let Some(pos) = element.attrs.iter().position(|(k, _)| k == "Self")
        && pos > 0
    {
        let entry = element.attrs.remove(pos);
        element.attrs.insert(0, entry);
    }

    // Rebuild each property group with edited or original values.
    for group_name in group_order {
        let mut group = Element::new(group_name);
        for field in &fields {
            let Source::Property {
                group: field_group,
                attrs,
                value,
            } = &field.source
            else {
                continue;
            };
            if field_group != group_name {
                continue;
            }
            let mut property = Element::new(field.key.clone());
            property.attrs = attrs.clone();
            match edits.value(&field.key) {
                Some(Some(edited)) => {
                    if !edited.is_empty() {
                        property.push(Node::Text(edited.clone()));
                    }
                }
                _ => match value {
                    PropertyValue::Text(text) => {
                        if !text.is_empty() {
                            property.push(Node::Text(text.clone()));
                        }
                    }
                    PropertyValue::List(items) => {
                        for item in items {
                            let mut list_item = Element::new("ListItem");
                            list_item.attrs = item.attrs.clone();
                            if !item.value.is_empty() {
                                list_item.push(Node::Text(item.value.clone()));
                            }
                            property.push_element(list_item);
                        }
                    }
                },
            }
            group.push_element(property);
        }
        element.push_element(group);
    }

    for child in extra_children {
        element.push(child);
    }

    element
}

fn collect_fields(element: &Element, property_groups: &[&str]) -> Vec<Field> {
    let mut fields: Vec<Field> = element
        .attrs
        .iter()
        .map(|(key, value)| Field {
            key: key.clone(),
            source: Source::Attribute(value.clone()),
        })
        .collect();

    for group in element
        .elements()
        .filter(|el| property_groups.contains(&el.tag.as_str()) && el.elements().next().is_some())
    {
        for property in group.elements() {
            if COMPLEX_PROPERTIES.contains(&property.tag.as_str()) {
                continue;
            }
            let value = if property.attr("type") == Some("list") {
                PropertyValue::List(
                    property
                        .descendants_named("ListItem")
                        .into_iter()
                        .map(|item| ListItem {
                            attrs: item.attrs.clone(),
                            value: item.text(),
                        })
                        .collect(),
                )
            } else {
                PropertyValue::Text(property.text())
            };
            let source = Source::Property {
                group: group.tag.clone(),
                attrs: property.attrs.clone(),
                value,
            };
            // A field present both as an attribute and inside a property
            // group is ambiguous; the group placement wins.
            match fields.iter_mut().find(|f| f.key == property.tag) {
                Some(existing) => existing.source = source,
                None => fields.push(Field {
                    key: property.tag.clone(),
                    source,
                }),
            }
        }
    }

    fields
}

/// Flattened field view of an element: attributes plus the text values of
/// property-group children, keyed by field name. This is the read-side
/// companion of [`patch`] used by every entity parser.
pub struct FieldMap {
    entries: Vec<(String, Option<String>)>,
}

impl FieldMap {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .and_then(|(_, v)| v.as_deref())
    }

    pub fn string(&self, key: &str) -> Option<String> {
        self.get(key).map(str::to_string)
    }

    pub fn number(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(crate::util::parse_number)
    }

    pub fn bool_or(&self, key: &str, default: bool) -> bool {
        crate::util::parse_bool(self.get(key), default)
    }

    pub fn number_list(&self, key: &str) -> Option<Vec<f64>> {
        self.get(key).map(crate::util::parse_number_list)
    }
}

/// Collect the flattened field view of `element`.
pub fn element_fields(element: &Element, property_groups: &[&str]) -> FieldMap {
    let entries = collect_fields(element, property_groups)
        .into_iter()
        .map(|field| {
            let value = match field.source {
                Source::Attribute(v) => Some(v),
                Source::Property { value, .. } => match value {
                    PropertyValue::Text(text) => Some(text),
                    PropertyValue::List(_) => None,
                },
            };
            (field.key, value)
        })
        .collect();
    FieldMap { entries }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::parse_document;

    fn parse(source: &str) -> Element {
        parse_document(source).unwrap().root
    }

    #[test]
    fn test_patch_idempotent_with_empty_edits() {
        let original = parse(
            r#"<Color Self="Color/u1" Model="Process" Space="RGB" ColorValue="255 0 0">
<Properties><Label>keep me</Label><Extra type="long">7</Extra></Properties>
</Color>"#,
        );
        let patched = patch(
            "Color",
            &Edits::new(),
            Identity::Element(&original),
            &["Properties"],
            Vec::new(),
        );

        assert_eq!(patched.attrs, original.attrs);
        let props = patched.first_child("Properties").unwrap();
        let label = props.first_child("Label").unwrap();
        assert_eq!(label.text(), "keep me");
        let extra = props.first_child("Extra").unwrap();
        assert_eq!(extra.attr("type"), Some("long"));
        assert_eq!(extra.text(), "7");
    }

    #[test]
    fn test_patch_overrides_attribute() {
        let original = parse(r#"<Color Self="Color/u1" Space="RGB" ColorValue="0 0 0"/>"#);
        let patched = patch(
            "Color",
            &Edits::new().set("ColorValue", "255 0 0"),
            Identity::Element(&original),
            &["Properties"],
            Vec::new(),
        );
        assert_eq!(patched.attr("ColorValue"), Some("255 0 0"));
        assert_eq!(patched.attr("Space"), Some("RGB"));
    }

    #[test]
    fn test_patch_edit_inside_property_group() {
        let original = parse(
            r#"<Page Self="u1"><Properties><PageColor type="enumeration">UseMasterColor</PageColor></Properties></Page>"#,
        );
        let patched = patch(
            "Page",
            &Edits::new().set("PageColor", "Red"),
            Identity::Element(&original),
            &["Properties"],
            Vec::new(),
        );
        // Edit lands inside the group, not as an attribute
        assert_eq!(patched.attr("PageColor"), None);
        let color = patched
            .first_child("Properties")
            .and_then(|p| p.first_child("PageColor"))
            .unwrap();
        assert_eq!(color.text(), "Red");
        assert_eq!(color.attr("type"), Some("enumeration"));
    }

    #[test]
    fn test_patch_new_key_defaults_to_attribute() {
        let original = parse(r#"<Rectangle Self="u1"/>"#);
        let patched = patch(
            "Rectangle",
            &Edits::new().set("FillColor", "Color/u2"),
            Identity::Element(&original),
            &["Properties"],
            Vec::new(),
        );
        assert_eq!(patched.attr("FillColor"), Some("Color/u2"));
    }

    #[test]
    fn test_patch_absent_everywhere_is_omitted() {
        let original = parse(r#"<Rectangle Self="u1"/>"#);
        let none: Option<String> = None;
        let patched = patch(
            "Rectangle",
            &Edits::new().set("StrokeColor", none),
            Identity::Element(&original),
            &["Properties"],
            Vec::new(),
        );
        assert_eq!(patched.attr("StrokeColor"), None);
        assert_eq!(patched.attrs.len(), 1);
    }

    #[test]
    fn test_patch_lookup_by_id() {
        let root = parse(
            r#"<idPkg:Graphic xmlns:idPkg="ns"><Color Self="Color/u1" Space="RGB"/><Color Self="Color/u2" Space="CMYK"/></idPkg:Graphic>"#,
        );
        let patched = patch(
            "Color",
            &Edits::new(),
            Identity::Id {
                root: &root,
                id: "Color/u2",
            },
            &["Properties"],
            Vec::new(),
        );
        assert_eq!(patched.attr("Self"), Some("Color/u2"));
        assert_eq!(patched.attr("Space"), Some("CMYK"));
    }

    #[test]
    fn test_patch_without_identity_authors_new_element() {
        let patched = patch(
            "Color",
            &Edits::new()
                .set("Self", "Color/u9")
                .set("Space", "RGB")
                .set("ColorValue", "0 0 255"),
            Identity::None,
            &["Properties"],
            Vec::new(),
        );
        assert_eq!(patched.attr("Self"), Some("Color/u9"));
        assert_eq!(patched.attr("ColorValue"), Some("0 0 255"));
        assert!(patched.children.is_empty());
    }

    #[test]
    fn test_patch_identity_id_wins_over_original_self() {
        let root = parse(r#"<Root><Spread Self="u1" Hidden="false"/></Root>"#);
        let patched = patch(
            "Spread",
            &Edits::new(),
            Identity::Id {
                root: &root,
                id: "u1",
            },
            &["Properties"],
            Vec::new(),
        );
        assert_eq!(patched.attrs[0], ("Self".to_string(), "u1".to_string()));
        assert_eq!(patched.attr("Hidden"), Some("false"));
    }

    #[test]
    fn test_patch_preserves_list_properties() {
        let original = parse(
            r#"<Style Self="s"><Properties><TabList type="list"><ListItem type="record">a</ListItem><ListItem type="record">b</ListItem></TabList></Properties></Style>"#,
        );
        let patched = patch(
            "Style",
            &Edits::new(),
            Identity::Element(&original),
            &["Properties"],
            Vec::new(),
        );
        let list = patched
            .first_child("Properties")
            .and_then(|p| p.first_child("TabList"))
            .unwrap();
        let items: Vec<_> = list.children_named("ListItem").collect();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].text(), "a");
        assert_eq!(items[1].text(), "b");
        assert_eq!(items[1].attr("type"), Some("record"));
    }

    #[test]
    fn test_patch_skips_complex_property_and_reattaches_extra() {
        let original = parse(
            r#"<Rectangle Self="u1"><Properties><PathGeometry><GeometryPathType PathOpen="false"/></PathGeometry><Label>x</Label></Properties></Rectangle>"#,
        );
        let rebuilt_geometry = parse(r#"<PathGeometry><GeometryPathType PathOpen="true"/></PathGeometry>"#);
        let patched = patch(
            "Rectangle",
            &Edits::new(),
            Identity::Element(&original),
            &["Properties"],
            vec![Node::Element(rebuilt_geometry)],
        );
        // The old geometry is not duplicated; the rebuilt one rides along as
        // an extra child, and the simple Label property survives.
        let props = patched.first_child("Properties").unwrap();
        assert!(props.first_child("PathGeometry").is_none());
        assert!(props.first_child("Label").is_some());
        assert!(patched.first_child("PathGeometry").is_some());
    }

    #[test]
    fn test_element_fields_flattens_attributes_and_properties() {
        let element = parse(
            r#"<Story Self="u7" UserText="true"><Properties><StoryTitle>T</StoryTitle></Properties></Story>"#,
        );
        let fields = element_fields(&element, &["Properties"]);
        assert_eq!(fields.get("Self"), Some("u7"));
        assert!(fields.bool_or("UserText", false));
        assert_eq!(fields.get("StoryTitle"), Some("T"));
        assert_eq!(fields.get("Missing"), None);
    }
}
