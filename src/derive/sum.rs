//! Sum-type (ADT) handler derivation: discriminator-field dispatch across a
//! fixed set of variants, each described by its own
//! [`DocumentReader`]/[`DocumentWriter`] for the *whole* enum type.

use crate::{
    bson::Bson,
    codec::{DocumentReader, DocumentWriter},
    document::Document,
    error::{Error, Result},
};

/// Reads one document field (the discriminator) and dispatches the rest of
/// the document to whichever variant's reader it names.
pub struct SumReader<T> {
    discriminator_field: String,
    variants: Vec<(String, Box<dyn DocumentReader<T>>)>,
}

impl<T> DocumentReader<T> for SumReader<T> {
    fn read_document(&self, doc: &Document) -> Result<T> {
        let tag = doc
            .get(&self.discriminator_field)
            .ok_or_else(Error::value_not_found)
            .map_err(|e| e.with_key(self.discriminator_field.clone()))?;
        let tag = match tag {
            Bson::String(s) => s.as_str(),
            other => {
                return Err(Error::type_mismatch("string", other.type_name())
                    .with_key(self.discriminator_field.clone()))
            }
        };
        self.variants
            .iter()
            .find(|(name, _)| name == tag)
            .ok_or_else(|| {
                Error::type_mismatch("known discriminator", "unknown discriminator")
                    .with_key(self.discriminator_field.clone())
            })?
            .1
            .read_document(doc)
    }
}

/// Builds a [`SumReader`] one variant at a time, rejecting a duplicate
/// discriminator tag at construction time.
pub struct SumReaderBuilder<T> {
    discriminator_field: String,
    variants: Vec<(String, Box<dyn DocumentReader<T>>)>,
}

impl<T> SumReaderBuilder<T> {
    /// Starts a new builder dispatching on `discriminator_field`.
    pub fn new(discriminator_field: impl Into<String>) -> Self {
        SumReaderBuilder {
            discriminator_field: discriminator_field.into(),
            variants: Vec::new(),
        }
    }

    /// Registers a variant: `tag` is the discriminator value that selects
    /// `reader`, which must decode the *entire* sum type (not just its own
    /// payload).
    pub fn variant(
        mut self,
        tag: impl Into<String>,
        reader: impl DocumentReader<T> + 'static,
    ) -> Result<Self> {
        let tag = tag.into();
        if self.variants.iter().any(|(existing, _)| *existing == tag) {
            return Err(Error::derivation(format!(
                "duplicate discriminator tag \"{tag}\""
            )));
        }
        self.variants.push((tag, Box::new(reader)));
        Ok(self)
    }

    /// Finishes the builder, requiring at least one registered variant.
    pub fn build(self) -> Result<SumReader<T>> {
        if self.variants.is_empty() {
            return Err(Error::derivation("a sum type must have at least one variant"));
        }
        Ok(SumReader {
            discriminator_field: self.discriminator_field,
            variants: self.variants,
        })
    }
}

/// Encodes a sum type by dispatching `value` to a per-variant encoder, then
/// stamping the discriminator field onto the result.
pub struct SumWriter<T> {
    discriminator_field: String,
    dispatch: Box<dyn Fn(&T) -> Result<(String, Document)>>,
}

impl<T> DocumentWriter<T> for SumWriter<T> {
    fn write_document(&self, value: &T) -> Result<Document> {
        let (tag, doc) = (self.dispatch)(value)?;
        Ok(doc.append(self.discriminator_field.clone(), tag))
    }
}

impl<T> SumWriter<T> {
    /// Builds a `SumWriter` from `discriminator_field` and a `dispatch`
    /// closure that maps a sum-type value to its variant's discriminator tag
    /// and encoded document (without the discriminator field, which this
    /// writer adds).
    pub fn new(
        discriminator_field: impl Into<String>,
        dispatch: impl Fn(&T) -> Result<(String, Document)> + 'static,
    ) -> Self {
        SumWriter {
            discriminator_field: discriminator_field.into(),
            dispatch: Box::new(dispatch),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        codec::primitive::Int32Handler,
        derive::record::{build_reader, build_writer, keyed_field, keyed_field_writer},
    };

    #[derive(Clone, Debug, PartialEq)]
    enum Shape {
        Circle { radius: i32 },
        Square { side: i32 },
    }

    fn reader() -> SumReader<Shape> {
        SumReaderBuilder::new("className")
            .variant(
                "circle",
                build_reader(keyed_field("radius", Int32Handler), |radius| Shape::Circle {
                    radius,
                }),
            )
            .unwrap()
            .variant(
                "square",
                build_reader(keyed_field("side", Int32Handler), |side| Shape::Square { side }),
            )
            .unwrap()
            .build()
            .unwrap()
    }

    fn writer() -> SumWriter<Shape> {
        SumWriter::new("className", |shape: &Shape| match shape {
            Shape::Circle { radius } => Ok((
                "circle".to_owned(),
                build_writer(keyed_field_writer("radius", Int32Handler, |r: &i32| *r))
                    .write_document(radius)?,
            )),
            Shape::Square { side } => Ok((
                "square".to_owned(),
                build_writer(keyed_field_writer("side", Int32Handler, |s: &i32| *s))
                    .write_document(side)?,
            )),
        })
    }

    #[test]
    fn dispatches_by_discriminator_round_trip() {
        let r = reader();
        let w = writer();
        let shape = Shape::Circle { radius: 5 };
        let doc = w.write_document(&shape).unwrap();
        assert_eq!(doc.get("className"), Some(&Bson::String("circle".to_owned())));
        assert_eq!(r.read_document(&doc).unwrap(), shape);
    }

    #[test]
    fn unknown_discriminator_fails() {
        let r = reader();
        let doc = Document::new().append("className", "triangle");
        assert!(r.read_document(&doc).is_err());
    }

    #[test]
    fn duplicate_tag_rejected_at_build_time() {
        let result = SumReaderBuilder::<Shape>::new("className")
            .variant("circle", build_reader(keyed_field("radius", Int32Handler), |radius| {
                Shape::Circle { radius }
            }))
            .unwrap()
            .variant("circle", build_reader(keyed_field("side", Int32Handler), |side| {
                Shape::Square { side }
            }));
        assert!(result.is_err());
    }
}
