//! L5X-specific navigation over the generic tree.
//!
//! Controller exports keep diagnostic text in two places, both shaped as
//! `Comments/Comment[@Operand]/LocalizedComment[@Lang]` with a CDATA
//! payload: under each `iDiagnostic<N>` parameter of an
//! `AddOnInstructionDefinition`, and under each controller-scoped `Tag`.
//! These helpers locate those elements and edit localized text without
//! the callers touching tree internals.

use crate::tree::{Document, Element};

/// All AOI definitions in the document, in document order.
pub fn definitions(doc: &Document) -> Vec<&Element> {
    doc.root.descendants_named("AddOnInstructionDefinition")
}

/// Controller-scoped tags (`Controller/Tags/Tag`).
pub fn controller_tags(doc: &Document) -> Vec<&Element> {
    doc.root
        .child("Controller")
        .and_then(|c| c.child("Tags"))
        .map(|tags| tags.children_named("Tag").collect())
        .unwrap_or_default()
}

/// Mutable access to controller-scoped tags.
pub fn controller_tags_mut(doc: &mut Document) -> Vec<&mut Element> {
    doc.root
        .child_mut("Controller")
        .and_then(|c| c.child_mut("Tags"))
        .map(|tags| tags.children_named_mut("Tag").collect())
        .unwrap_or_default()
}

/// The `Comments` child of a tag or parameter, if present.
pub fn comments(parent: &Element) -> Option<&Element> {
    parent.child("Comments")
}

pub fn comments_mut(parent: &mut Element) -> Option<&mut Element> {
    parent.child_mut("Comments")
}

/// The `Comments` child of a tag, created before the `Data` element when
/// missing (matching where the export format places it).
pub fn ensure_comments(tag: &mut Element) -> &mut Element {
    if tag.child("Comments").is_some() {
        return tag.child_mut("Comments").expect("just checked");
    }
    tag.insert_element_before("Data", Element::new("Comments"))
}

/// The comment with the given operand, compared case-insensitively.
pub fn comment_for_operand<'a>(comments: &'a Element, operand: &str) -> Option<&'a Element> {
    comments
        .children_named("Comment")
        .find(|c| operand_matches(c, operand))
}

pub fn comment_for_operand_mut<'a>(
    comments: &'a mut Element,
    operand: &str,
) -> Option<&'a mut Element> {
    comments
        .children_named_mut("Comment")
        .find(|c| operand_matches(c, operand))
}

fn operand_matches(comment: &Element, operand: &str) -> bool {
    comment
        .attr("Operand")
        .is_some_and(|o| o.eq_ignore_ascii_case(operand))
}

/// Localized texts of one comment as (language, text) pairs. Embedded
/// newlines are stripped: exports wrap long CDATA payloads, and the
/// comparison logic works on the unwrapped text.
pub fn localized_texts(comment: &Element) -> Vec<(String, String)> {
    comment
        .children_named("LocalizedComment")
        .filter_map(|loc| {
            let lang = loc.attr("Lang")?.to_string();
            Some((lang, loc.text().replace('\n', "")))
        })
        .collect()
}

/// Text of one language in one comment, `None` when absent.
pub fn localized_text(comment: &Element, lang: &str) -> Option<String> {
    comment
        .children_named("LocalizedComment")
        .find(|loc| loc.attr("Lang") == Some(lang))
        .map(|loc| loc.text().replace('\n', ""))
}

/// Set (or create) the localized text of one language as CDATA.
pub fn set_localized_text(comment: &mut Element, lang: &str, text: &str) {
    if let Some(loc) = comment
        .children_named_mut("LocalizedComment")
        .find(|loc| loc.attr("Lang") == Some(lang))
    {
        loc.set_cdata(text);
        return;
    }
    let mut loc = Element::new("LocalizedComment");
    loc.set_attr("Lang", lang);
    loc.set_cdata(text);
    comment.push_element(loc);
}

/// Remove localized entries whose language fails the predicate.
pub fn retain_languages<F>(comment: &mut Element, mut keep: F)
where
    F: FnMut(&str) -> bool,
{
    comment.retain_elements("LocalizedComment", |loc| {
        loc.attr("Lang").is_some_and(&mut keep)
    });
}

/// Build a new `Comment` element for the given operand.
#[must_use]
pub fn new_comment(operand: &str) -> Element {
    let mut comment = Element::new("Comment");
    comment.set_attr("Operand", operand);
    comment
}
