//! Two-phase binding for self-referential record/sum types: a field whose
//! type recursively contains the type being derived can't borrow the handler
//! being built, since it doesn't exist yet. [`RecursiveHandler`] is declared
//! first, used as a placeholder while the real handler is assembled, then
//! [`RecursiveHandler::bind`] ties the knot.

use std::sync::OnceLock;

use crate::{
    bson::Bson,
    codec::{Reader, Writer},
    error::{Error, Result},
};

/// A [`Reader`]/[`Writer`] whose real implementation is supplied after
/// construction via [`RecursiveHandler::bind`].
///
/// Reads/writes performed before binding fail with a
/// [`crate::error::ErrorKind::DerivationError`] rather than panicking, since
/// a caller might race a field's own lazily-built handler against its first
/// use in pathological derivation orderings.
pub struct RecursiveHandler<T> {
    inner: OnceLock<Box<dyn Handler<T> + Send + Sync>>,
}

trait Handler<T>: Reader<T> + Writer<T> {}
impl<T, H: Reader<T> + Writer<T> + ?Sized> Handler<T> for H {}

impl<T> RecursiveHandler<T> {
    /// An unbound recursive handler placeholder.
    pub const fn new() -> Self {
        RecursiveHandler {
            inner: OnceLock::new(),
        }
    }

    /// Supplies the real handler. Only the first call takes effect; later
    /// calls are no-ops, matching the expectation that binding happens once,
    /// immediately after the recursive type's handler finishes building.
    pub fn bind(&self, handler: impl Reader<T> + Writer<T> + Send + Sync + 'static) {
        let _ = self.inner.set(Box::new(handler));
    }

    fn get(&self) -> Result<&(dyn Handler<T> + Send + Sync)> {
        self.inner
            .get()
            .map(|b| b.as_ref())
            .ok_or_else(|| Error::derivation("recursive handler used before it was bound"))
    }
}

impl<T> Default for RecursiveHandler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Reader<T> for RecursiveHandler<T> {
    fn read_try(&self, value: &Bson) -> Result<T> {
        self.get()?.read_try(value)
    }
}

impl<T> Writer<T> for RecursiveHandler<T> {
    fn write_try(&self, value: &T) -> Result<Bson> {
        self.get()?.write_try(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        codec::{expect_document, primitive::Int32Handler, DocumentReader, DocumentWriter},
        document::Document,
    };

    #[derive(Clone, Debug, PartialEq)]
    struct Node {
        value: i32,
        child: Option<Box<Node>>,
    }

    static NODE_HANDLER: RecursiveHandler<Node> = RecursiveHandler::new();

    struct NodeDocumentCodec;

    impl DocumentReader<Node> for NodeDocumentCodec {
        fn read_document(&self, doc: &Document) -> Result<Node> {
            let value = doc
                .get("value")
                .ok_or_else(Error::value_not_found)
                .and_then(|v| Int32Handler.read_try(v))?;
            let child = match doc.get("child") {
                None | Some(Bson::Null) => None,
                Some(child_value) => Some(Box::new(NODE_HANDLER.read_try(child_value)?)),
            };
            Ok(Node { value, child })
        }
    }

    impl DocumentWriter<Node> for NodeDocumentCodec {
        fn write_document(&self, node: &Node) -> Result<Document> {
            let mut doc = Document::new().append("value", node.value);
            if let Some(child) = &node.child {
                doc = doc.append("child", NODE_HANDLER.write_try(child)?);
            }
            Ok(doc)
        }
    }

    struct NodeHandler;

    impl Reader<Node> for NodeHandler {
        fn read_try(&self, value: &Bson) -> Result<Node> {
            NodeDocumentCodec.read_document(expect_document(value)?)
        }
    }

    impl Writer<Node> for NodeHandler {
        fn write_try(&self, value: &Node) -> Result<Bson> {
            NodeDocumentCodec.write_document(value).map(Bson::Document)
        }
    }

    #[test]
    fn unbound_handler_fails_without_panicking() {
        let handler: RecursiveHandler<i32> = RecursiveHandler::new();
        assert!(handler.read_try(&Bson::Int32(1)).is_err());
    }

    #[test]
    fn bound_recursive_handler_round_trips_nested_values() {
        NODE_HANDLER.bind(NodeHandler);

        let tree = Node {
            value: 1,
            child: Some(Box::new(Node {
                value: 2,
                child: None,
            })),
        };

        let encoded = NODE_HANDLER.write_try(&tree).unwrap();
        let decoded = NODE_HANDLER.read_try(&encoded).unwrap();
        assert_eq!(decoded, tree);
    }
}
