//! Tensor shapes and the `--input_shapes` string format.
//!
//! A shape specification lists one shape per model input, separated by `:`,
//! with the dimensions of each shape separated by `,`:
//!
//! ```text
//! 1,3,224,224:1,10
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{ShapeParseError, ShapeParseResult};

/// Shape used when no `--input_shapes` is given.
pub const DEFAULT_INPUT_SHAPE: [usize; 4] = [1, 3, 224, 224];

/// Largest extent of a single dimension. The engine takes `int32` extents.
pub const MAX_DIM: usize = i32::MAX as usize;

/// Largest element count of a parsed shape.
pub const MAX_ELEMENTS: usize = i32::MAX as usize;

const SHAPE_SEPARATOR: char = ':';
const DIM_SEPARATOR: char = ',';

/// Dimensions of a single tensor, outermost first.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Shape(Vec<usize>);

impl Shape {
    pub fn new(dims: Vec<usize>) -> Self {
        Self(dims)
    }

    pub fn dims(&self) -> &[usize] {
        &self.0
    }

    pub fn rank(&self) -> usize {
        self.0.len()
    }

    /// Number of elements in a tensor of this shape, or `None` if it does not
    /// fit in `usize`. A rank-0 shape holds a single scalar.
    pub fn checked_numel(&self) -> Option<usize> {
        self.0.iter().try_fold(1usize, |acc, &d| acc.checked_mul(d))
    }

    /// Like [`Shape::checked_numel`], saturating at `usize::MAX`.
    pub fn numel(&self) -> usize {
        self.checked_numel().unwrap_or(usize::MAX)
    }

    /// Converts extents reported by the engine. Returns `None` when any
    /// extent is negative, i.e. not resolved yet.
    pub fn from_engine_dims(dims: &[i32]) -> Option<Self> {
        dims.iter()
            .map(|&d| usize::try_from(d).ok())
            .collect::<Option<Vec<_>>>()
            .map(Self)
    }

    /// Parses one comma-separated shape such as `1,3,224,224`.
    ///
    /// Trailing commas are allowed; an empty token anywhere else is not.
    pub fn parse(text: &str) -> ShapeParseResult<Self> {
        let body = text.trim().trim_end_matches(DIM_SEPARATOR);
        if body.trim().is_empty() {
            return Ok(Self(Vec::new()));
        }

        let mut dims = Vec::new();
        for token in body.split(DIM_SEPARATOR).map(str::trim) {
            let dim: usize = token
                .parse()
                .map_err(|_| ShapeParseError::InvalidDimension {
                    shape: text.to_string(),
                    token: token.to_string(),
                })?;
            if dim == 0 {
                return Err(ShapeParseError::ZeroDimension {
                    shape: text.to_string(),
                });
            }
            if dim > MAX_DIM {
                return Err(ShapeParseError::DimensionTooLarge {
                    shape: text.to_string(),
                    token: token.to_string(),
                });
            }
            dims.push(dim);
        }

        let shape = Self(dims);
        match shape.checked_numel() {
            Some(numel) if numel <= MAX_ELEMENTS => Ok(shape),
            _ => Err(ShapeParseError::TooManyElements {
                shape: text.to_string(),
            }),
        }
    }
}

impl From<Vec<usize>> for Shape {
    fn from(dims: Vec<usize>) -> Self {
        Self(dims)
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, dim) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "{DIM_SEPARATOR}")?;
            }
            write!(f, "{dim}")?;
        }
        Ok(())
    }
}

/// Ordered input shapes, one per model input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InputShapes(Vec<Shape>);

impl InputShapes {
    pub fn new(shapes: Vec<Shape>) -> Self {
        Self(shapes)
    }

    /// Parses a full specification such as `1,3,224,224:1,10`.
    ///
    /// A blank specification yields the default `1,3,224,224` shape. A
    /// specification made only of separators is rejected.
    pub fn parse(spec: &str) -> ShapeParseResult<Self> {
        if spec.trim().is_empty() {
            return Ok(Self::default());
        }

        let mut shapes = Vec::new();
        for segment in spec.split(SHAPE_SEPARATOR) {
            if segment.trim().is_empty() {
                continue;
            }
            let shape = Shape::parse(segment)?;
            if shape.rank() > 0 {
                shapes.push(shape);
            }
        }

        if shapes.is_empty() {
            return Err(ShapeParseError::Empty {
                spec: spec.to_string(),
            });
        }
        Ok(Self(shapes))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Shape> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[Shape] {
        &self.0
    }
}

impl Default for InputShapes {
    fn default() -> Self {
        Self(vec![Shape::new(DEFAULT_INPUT_SHAPE.to_vec())])
    }
}

impl FromStr for InputShapes {
    type Err = ShapeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for InputShapes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, shape) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "{SHAPE_SEPARATOR}")?;
            }
            write!(f, "{shape}")?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a InputShapes {
    type Item = &'a Shape;
    type IntoIter = std::slice::Iter<'a, Shape>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_two_shapes() {
        let shapes = InputShapes::parse("1,3,224,224:1,10").unwrap();
        assert_eq!(shapes.len(), 2);
        assert_eq!(shapes.as_slice()[0].dims(), &[1, 3, 224, 224]);
        assert_eq!(shapes.as_slice()[1].dims(), &[1, 10]);
    }

    #[test]
    fn parses_single_shape_without_colon() {
        let shapes = InputShapes::parse("4,16").unwrap();
        assert_eq!(shapes.len(), 1);
        assert_eq!(shapes.as_slice()[0].numel(), 64);
    }

    #[test]
    fn blank_spec_falls_back_to_default() {
        assert_eq!(InputShapes::parse("  ").unwrap(), InputShapes::default());
        assert_eq!(InputShapes::default().to_string(), "1,3,224,224");
    }

    #[test]
    fn trailing_separators_are_ignored() {
        let shapes = InputShapes::parse("1,3,:2,2,:").unwrap();
        assert_eq!(shapes.to_string(), "1,3:2,2");
    }

    #[test]
    fn rejects_interior_empty_dimension() {
        assert!(matches!(
            InputShapes::parse("1,,3"),
            Err(ShapeParseError::InvalidDimension { token, .. }) if token.is_empty()
        ));
        assert!(matches!(
            InputShapes::parse(",1,3"),
            Err(ShapeParseError::InvalidDimension { .. })
        ));
    }

    #[test]
    fn rejects_dimensions_beyond_int32() {
        assert!(matches!(
            InputShapes::parse("4294967296,4294967296"),
            Err(ShapeParseError::DimensionTooLarge { token, .. }) if token == "4294967296"
        ));
        assert!(InputShapes::parse("2147483647").is_ok());
    }

    #[test]
    fn rejects_element_count_overflow() {
        assert!(matches!(
            InputShapes::parse("65536,65536,65536,65536"),
            Err(ShapeParseError::TooManyElements { .. })
        ));
        assert!(matches!(
            InputShapes::parse("2147483647,2"),
            Err(ShapeParseError::TooManyElements { .. })
        ));
    }

    #[test]
    fn numel_saturates_instead_of_overflowing() {
        let shape = Shape::new(vec![usize::MAX, 2]);
        assert_eq!(shape.checked_numel(), None);
        assert_eq!(shape.numel(), usize::MAX);
        assert_eq!(Shape::new(Vec::new()).numel(), 1);
    }

    #[test]
    fn engine_dims_must_be_resolved() {
        assert_eq!(
            Shape::from_engine_dims(&[1, 3, 4]),
            Some(Shape::new(vec![1, 3, 4]))
        );
        assert_eq!(Shape::from_engine_dims(&[-1, 3]), None);
    }

    #[test]
    fn display_round_trips() {
        let spec = "1,3,224,224:1,10:7";
        assert_eq!(InputShapes::parse(spec).unwrap().to_string(), spec);
    }

    #[test]
    fn rejects_bad_dimensions() {
        assert!(matches!(
            InputShapes::parse("1,x,3"),
            Err(ShapeParseError::InvalidDimension { token, .. }) if token == "x"
        ));
        assert!(matches!(
            InputShapes::parse("1,0"),
            Err(ShapeParseError::ZeroDimension { .. })
        ));
        assert!(matches!(
            InputShapes::parse("-1,3"),
            Err(ShapeParseError::InvalidDimension { .. })
        ));
        assert!(matches!(
            InputShapes::parse(":,:"),
            Err(ShapeParseError::Empty { .. })
        ));
    }
}
