//! Attaching resolved markup to the tree.

use embedder_mdast::hast::{self, FragmentError};
use embedder_mdast::{Data, Paragraph};

/// Parse `markup` as an HTML fragment and annotate `paragraph` with its root
/// element.
///
/// The paragraph's children are kept; serializers render the annotation in
/// its place. Only the first top-level node of the fragment is used, and it
/// must be an element.
///
/// # Example
///
/// ```
/// use embedder::splice::splice;
/// use embedder_mdast::Paragraph;
///
/// let mut paragraph = Paragraph::default();
/// splice(&mut paragraph, "<div>x</div>").unwrap();
///
/// assert_eq!(paragraph.data.unwrap().h_name, "div");
/// ```
pub fn splice(paragraph: &mut Paragraph, markup: &str) -> Result<(), FragmentError> {
    let element = hast::parse_fragment(markup)?;
    paragraph.data = Some(Data::from(element));
    Ok(())
}
