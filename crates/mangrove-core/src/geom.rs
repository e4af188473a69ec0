pub type Unit = euclid::UnknownUnit;

pub type Point = euclid::Point2D<f64, Unit>;
pub type Vector = euclid::Vector2D<f64, Unit>;

pub fn point(x: f64, y: f64) -> Point {
    euclid::point2(x, y)
}

pub fn vector(x: f64, y: f64) -> Vector {
    euclid::vec2(x, y)
}

/// Layout axis convention for a whole tree.
///
/// `Horizontal` trees grow along the x axis, so the layout engine's `(x, y)`
/// pair swaps before it becomes screen geometry. This is the single projection
/// rule shared by node transforms and every link path style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Horizontal,
    Vertical,
}

impl Orientation {
    /// Maps a layout coordinate pair to screen space.
    pub fn project(self, x: f64, y: f64) -> Point {
        match self {
            Orientation::Horizontal => point(y, x),
            Orientation::Vertical => point(x, y),
        }
    }

    pub fn project_point(self, p: Point) -> Point {
        self.project(p.x, p.y)
    }
}

impl std::str::FromStr for Orientation {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s {
            "horizontal" => Ok(Orientation::Horizontal),
            "vertical" => Ok(Orientation::Vertical),
            other => Err(crate::Error::UnsupportedOrientation {
                value: other.to_string(),
            }),
        }
    }
}
