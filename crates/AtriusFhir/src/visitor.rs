//! Pre-order traversal of the model.
//!
//! Every model type implements [`Visitable`]. `accept` announces the node to
//! the [`Visitor`], then walks its child fields in declaration order. List
//! items carry their index, and primitive values arrive through
//! [`Visitor::visit_value`].
//!
//! ```rust
//! use atrius_fhir_lib::r4::{AppointmentResponse, Reference};
//! use atrius_fhir_lib::terminology::ParticipationStatus;
//! use atrius_fhir_lib::visitor::PathVisitor;
//! use atrius_fhir_lib::FhirResource;
//!
//! let response = AppointmentResponse::builder()
//!     .appointment(Reference::builder().reference("Appointment/a1").build().unwrap())
//!     .actor(Reference::builder().reference("Patient/p1").build().unwrap())
//!     .participant_status(ParticipationStatus::Accepted)
//!     .build()
//!     .unwrap();
//!
//! let mut paths = PathVisitor::default();
//! response.walk(&mut paths);
//! assert!(paths.paths().contains(&"AppointmentResponse.actor.reference"));
//! ```

use std::any::Any;
use std::fmt;

use crate::date_time::{PrecisionDate, PrecisionDateTime, PrecisionInstant, PrecisionTime};
use crate::element::Element;
use crate::precise_decimal::PreciseDecimal;
use crate::r4::Reference;

/// A primitive value as seen by a visitor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PrimitiveValue<'a> {
    String(&'a str),
    Code(&'a str),
    Boolean(bool),
    Integer(i32),
    Decimal(&'a PreciseDecimal),
    Date(&'a PrecisionDate),
    DateTime(&'a PrecisionDateTime),
    Instant(&'a PrecisionInstant),
    Time(&'a PrecisionTime),
}

impl fmt::Display for PrimitiveValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrimitiveValue::String(s) | PrimitiveValue::Code(s) => f.write_str(s),
            PrimitiveValue::Boolean(b) => write!(f, "{b}"),
            PrimitiveValue::Integer(i) => write!(f, "{i}"),
            PrimitiveValue::Decimal(d) => write!(f, "{d}"),
            PrimitiveValue::Date(d) => write!(f, "{d}"),
            PrimitiveValue::DateTime(d) => write!(f, "{d}"),
            PrimitiveValue::Instant(d) => write!(f, "{d}"),
            PrimitiveValue::Time(t) => write!(f, "{t}"),
        }
    }
}

/// Value types that can sit inside an [`Element`].
pub trait AsPrimitive {
    /// FHIR type name reported for elements holding this value.
    const FHIR_TYPE: &'static str;

    fn as_primitive(&self) -> PrimitiveValue<'_>;
}

impl AsPrimitive for String {
    const FHIR_TYPE: &'static str = "string";

    fn as_primitive(&self) -> PrimitiveValue<'_> {
        PrimitiveValue::String(self)
    }
}

impl AsPrimitive for bool {
    const FHIR_TYPE: &'static str = "boolean";

    fn as_primitive(&self) -> PrimitiveValue<'_> {
        PrimitiveValue::Boolean(*self)
    }
}

impl AsPrimitive for i32 {
    const FHIR_TYPE: &'static str = "integer";

    fn as_primitive(&self) -> PrimitiveValue<'_> {
        PrimitiveValue::Integer(*self)
    }
}

impl AsPrimitive for PreciseDecimal {
    const FHIR_TYPE: &'static str = "decimal";

    fn as_primitive(&self) -> PrimitiveValue<'_> {
        PrimitiveValue::Decimal(self)
    }
}

impl AsPrimitive for PrecisionDate {
    const FHIR_TYPE: &'static str = "date";

    fn as_primitive(&self) -> PrimitiveValue<'_> {
        PrimitiveValue::Date(self)
    }
}

impl AsPrimitive for PrecisionDateTime {
    const FHIR_TYPE: &'static str = "dateTime";

    fn as_primitive(&self) -> PrimitiveValue<'_> {
        PrimitiveValue::DateTime(self)
    }
}

impl AsPrimitive for PrecisionInstant {
    const FHIR_TYPE: &'static str = "instant";

    fn as_primitive(&self) -> PrimitiveValue<'_> {
        PrimitiveValue::Instant(self)
    }
}

impl AsPrimitive for PrecisionTime {
    const FHIR_TYPE: &'static str = "time";

    fn as_primitive(&self) -> PrimitiveValue<'_> {
        PrimitiveValue::Time(self)
    }
}

/// Receives the traversal. Every hook has a no-op default.
///
/// For each node the call order is `pre_visit`, `visit_start`, `visit`,
/// the children (only if `visit` returned `true`), `visit_end`, `post_visit`.
/// Returning `false` from `pre_visit` skips the node entirely.
#[allow(unused_variables)]
pub trait Visitor {
    fn pre_visit(&mut self, node: &dyn Visitable) -> bool {
        true
    }

    fn visit_start(&mut self, element_name: &str, index: Option<usize>, node: &dyn Visitable) {}

    /// Returns whether to descend into the node's children.
    fn visit(&mut self, element_name: &str, index: Option<usize>, node: &dyn Visitable) -> bool {
        true
    }

    /// A raw value: an element's `value`, an element `id` or `Extension.url`.
    fn visit_value(&mut self, element_name: &str, index: Option<usize>, value: PrimitiveValue<'_>) {}

    /// Called before the items of a non-empty list.
    fn visit_list_start(&mut self, element_name: &str, len: usize) {}

    fn visit_list_end(&mut self, element_name: &str) {}

    fn visit_end(&mut self, element_name: &str, index: Option<usize>, node: &dyn Visitable) {}

    fn post_visit(&mut self, node: &dyn Visitable) {}
}

/// A node of the model tree.
pub trait Visitable {
    /// FHIR type name, e.g. `InsurancePlan`, `InsurancePlan.coverage` or `code`.
    fn fhir_type_name(&self) -> &'static str;

    fn as_any(&self) -> &dyn Any;

    fn accept(&self, element_name: &str, index: Option<usize>, visitor: &mut dyn Visitor);
}

/// Visits the items of a repeating element; empty lists are skipped.
pub fn accept_list<T: Visitable>(items: &[T], element_name: &str, visitor: &mut dyn Visitor) {
    if items.is_empty() {
        return;
    }
    visitor.visit_list_start(element_name, items.len());
    for (i, item) in items.iter().enumerate() {
        item.accept(element_name, Some(i), visitor);
    }
    visitor.visit_list_end(element_name);
}

impl<V: AsPrimitive + 'static> Visitable for Element<V> {
    fn fhir_type_name(&self) -> &'static str {
        V::FHIR_TYPE
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn accept(&self, element_name: &str, index: Option<usize>, visitor: &mut dyn Visitor) {
        if !visitor.pre_visit(self) {
            return;
        }
        visitor.visit_start(element_name, index, self);
        if visitor.visit(element_name, index, self) {
            if let Some(id) = self.id() {
                visitor.visit_value("id", None, PrimitiveValue::String(id));
            }
            accept_list(self.extension(), "extension", visitor);
            if let Some(value) = self.value() {
                visitor.visit_value("value", None, value.as_primitive());
            }
        }
        visitor.visit_end(element_name, index, self);
        visitor.post_visit(self);
    }
}

/// Plain strings (`Extension.url`, element ids) are reported as values.
impl Visitable for String {
    fn fhir_type_name(&self) -> &'static str {
        "string"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn accept(&self, element_name: &str, index: Option<usize>, visitor: &mut dyn Visitor) {
        visitor.visit_value(element_name, index, PrimitiveValue::String(self));
    }
}

impl<T: Visitable + ?Sized> Visitable for Box<T> {
    fn fhir_type_name(&self) -> &'static str {
        (**self).fhir_type_name()
    }

    fn as_any(&self) -> &dyn Any {
        (**self).as_any()
    }

    fn accept(&self, element_name: &str, index: Option<usize>, visitor: &mut dyn Visitor) {
        (**self).accept(element_name, index, visitor)
    }
}

fn segment(element_name: &str, index: Option<usize>) -> String {
    match index {
        Some(i) => format!("{element_name}[{i}]"),
        None => element_name.to_string(),
    }
}

/// The current path during a traversal.
#[derive(Debug, Default)]
struct PathStack(Vec<String>);

impl PathStack {
    fn push(&mut self, element_name: &str, index: Option<usize>) {
        let next = match self.0.last() {
            Some(parent) => format!("{parent}.{}", segment(element_name, index)),
            None => segment(element_name, index),
        };
        self.0.push(next);
    }

    fn pop(&mut self) {
        self.0.pop();
    }

    fn current(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    fn child(&self, element_name: &str, index: Option<usize>) -> String {
        match self.current() {
            Some(parent) => format!("{parent}.{}", segment(element_name, index)),
            None => segment(element_name, index),
        }
    }
}

/// One node seen by [`PathVisitor`].
#[derive(Debug, Clone, PartialEq)]
pub struct VisitedNode {
    pub path: String,
    pub type_name: &'static str,
    /// The primitive value, for elements that carry one.
    pub value: Option<String>,
}

/// Records the FHIRPath-style path of every node and plain value, in
/// traversal order, e.g. `InsurancePlan.coverage[0].benefit[1].type`.
#[derive(Debug, Default)]
pub struct PathVisitor {
    stack: PathStack,
    open: Vec<usize>,
    nodes: Vec<VisitedNode>,
}

impl PathVisitor {
    pub fn nodes(&self) -> &[VisitedNode] {
        &self.nodes
    }

    pub fn paths(&self) -> Vec<&str> {
        self.nodes.iter().map(|n| n.path.as_str()).collect()
    }

    pub fn into_nodes(self) -> Vec<VisitedNode> {
        self.nodes
    }
}

impl Visitor for PathVisitor {
    fn visit_start(&mut self, element_name: &str, index: Option<usize>, node: &dyn Visitable) {
        self.stack.push(element_name, index);
        self.open.push(self.nodes.len());
        self.nodes.push(VisitedNode {
            path: self.stack.current().unwrap_or_default().to_string(),
            type_name: node.fhir_type_name(),
            value: None,
        });
    }

    fn visit_value(&mut self, element_name: &str, index: Option<usize>, value: PrimitiveValue<'_>) {
        if element_name == "value"
            && let Some(&owner) = self.open.last()
        {
            self.nodes[owner].value = Some(value.to_string());
            return;
        }
        self.nodes.push(VisitedNode {
            path: self.stack.child(element_name, index),
            type_name: "string",
            value: Some(value.to_string()),
        });
    }

    fn visit_end(&mut self, _: &str, _: Option<usize>, _: &dyn Visitable) {
        self.stack.pop();
        self.open.pop();
    }
}

/// Gathers every [`Reference`] in the tree together with its path.
#[derive(Debug, Default)]
pub struct ReferenceCollector {
    stack: PathStack,
    references: Vec<(String, Reference)>,
}

impl ReferenceCollector {
    pub fn references(&self) -> &[(String, Reference)] {
        &self.references
    }

    pub fn into_references(self) -> Vec<(String, Reference)> {
        self.references
    }
}

impl Visitor for ReferenceCollector {
    fn visit_start(&mut self, element_name: &str, index: Option<usize>, node: &dyn Visitable) {
        self.stack.push(element_name, index);
        if let Some(reference) = node.as_any().downcast_ref::<Reference>() {
            let path = self.stack.current().unwrap_or_default().to_string();
            self.references.push((path, reference.clone()));
        }
    }

    fn visit_end(&mut self, _: &str, _: Option<usize>, _: &dyn Visitable) {
        self.stack.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::r4::{Extension, ExtensionValue, FhirString, PositiveInt};

    #[derive(Default)]
    struct Trace(Vec<String>);

    impl Visitor for Trace {
        fn visit_start(&mut self, element_name: &str, index: Option<usize>, node: &dyn Visitable) {
            self.0.push(format!("start {} {}", segment(element_name, index), node.fhir_type_name()));
        }

        fn visit_value(&mut self, element_name: &str, _: Option<usize>, value: PrimitiveValue<'_>) {
            self.0.push(format!("value {element_name}={value}"));
        }

        fn visit_list_start(&mut self, element_name: &str, len: usize) {
            self.0.push(format!("list {element_name} {len}"));
        }

        fn visit_end(&mut self, element_name: &str, _: Option<usize>, _: &dyn Visitable) {
            self.0.push(format!("end {element_name}"));
        }
    }

    #[test]
    fn elements_report_id_extensions_then_value() {
        let extension = Extension::builder()
            .url("http://example.org/rank")
            .value(ExtensionValue::PositiveInt(PositiveInt::from(2)))
            .build()
            .unwrap();
        let element = FhirString::from("Gold").with_id("n1").add_extension(extension);

        let mut trace = Trace::default();
        element.accept("name", None, &mut trace);

        assert_eq!(
            trace.0,
            vec![
                "start name string",
                "value id=n1",
                "list extension 1",
                "start extension[0] Extension",
                "value url=http://example.org/rank",
                "start value integer",
                "value value=2",
                "end value",
                "end extension",
                "value value=Gold",
                "end name",
            ]
        );
    }

    struct SkipAll;

    impl Visitor for SkipAll {
        fn pre_visit(&mut self, _: &dyn Visitable) -> bool {
            false
        }

        fn visit_value(&mut self, _: &str, _: Option<usize>, _: PrimitiveValue<'_>) {
            panic!("skipped nodes must not report values");
        }
    }

    #[test]
    fn pre_visit_false_skips_the_node() {
        FhirString::from("x").accept("name", None, &mut SkipAll);
    }

    #[test]
    fn empty_lists_are_not_announced() {
        let mut trace = Trace::default();
        accept_list::<FhirString>(&[], "alias", &mut trace);
        assert!(trace.0.is_empty());
    }
}
