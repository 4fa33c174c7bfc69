//! Transform lists to `matrix()` / `matrix3d()`.

use super::values::ComponentValue;
use crate::util::format_number;

/// Row-major 4x4 matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix([[f64; 4]; 4]);

impl Matrix {
    pub const IDENTITY: Matrix = Matrix([
        [1.0, 0.0, 0.0, 0.0],
        [0.0, 1.0, 0.0, 0.0],
        [0.0, 0.0, 1.0, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ]);

    fn multiply(&self, other: &Matrix) -> Matrix {
        let mut out = [[0.0; 4]; 4];
        for (r, row) in out.iter_mut().enumerate() {
            for (c, cell) in row.iter_mut().enumerate() {
                *cell = (0..4).map(|k| self.0[r][k] * other.0[k][c]).sum();
            }
        }
        Matrix(out)
    }

    fn translate(x: f64, y: f64, z: f64) -> Matrix {
        let mut m = Self::IDENTITY;
        m.0[0][3] = x;
        m.0[1][3] = y;
        m.0[2][3] = z;
        m
    }

    fn scale(x: f64, y: f64, z: f64) -> Matrix {
        let mut m = Self::IDENTITY;
        m.0[0][0] = x;
        m.0[1][1] = y;
        m.0[2][2] = z;
        m
    }

    /// Rotation by `angle` radians about the axis `(x, y, z)`.
    fn rotate(x: f64, y: f64, z: f64, angle: f64) -> Option<Matrix> {
        let length = (x * x + y * y + z * z).sqrt();
        if length == 0.0 {
            return None;
        }
        let (x, y, z) = (x / length, y / length, z / length);
        let half = angle / 2.0;
        let sc = half.sin() * half.cos();
        let sq = half.sin() * half.sin();
        Some(Matrix([
            [
                1.0 - 2.0 * (y * y + z * z) * sq,
                2.0 * (x * y * sq - z * sc),
                2.0 * (x * z * sq + y * sc),
                0.0,
            ],
            [
                2.0 * (x * y * sq + z * sc),
                1.0 - 2.0 * (x * x + z * z) * sq,
                2.0 * (y * z * sq - x * sc),
                0.0,
            ],
            [
                2.0 * (x * z * sq - y * sc),
                2.0 * (y * z * sq + x * sc),
                1.0 - 2.0 * (x * x + y * y) * sq,
                0.0,
            ],
            [0.0, 0.0, 0.0, 1.0],
        ]))
    }

    fn skew(ax: f64, ay: f64) -> Matrix {
        let mut m = Self::IDENTITY;
        m.0[0][1] = ax.tan();
        m.0[1][0] = ay.tan();
        m
    }

    fn is_2d(&self) -> bool {
        let m = &self.0;
        m[0][2] == 0.0
            && m[1][2] == 0.0
            && m[2][0] == 0.0
            && m[2][1] == 0.0
            && m[2][2] == 1.0
            && m[2][3] == 0.0
            && m[3][0] == 0.0
            && m[3][1] == 0.0
            && m[3][2] == 0.0
            && m[3][3] == 1.0
    }

    /// Serialize as `matrix(a, b, c, d, e, f)` when two-dimensional, else
    /// `matrix3d(…)` in column-major order.
    pub fn to_css_string(&self) -> String {
        let m = &self.0;
        let values: Vec<f64> = if self.is_2d() {
            vec![m[0][0], m[1][0], m[0][1], m[1][1], m[0][3], m[1][3]]
        } else {
            (0..4).flat_map(|c| (0..4).map(move |r| m[r][c])).collect()
        };
        let name = if values.len() == 6 { "matrix" } else { "matrix3d" };
        let args: Vec<String> = values.into_iter().map(format_number).collect();
        format!("{name}({})", args.join(", "))
    }
}

/// Arguments of a transform function as plain numbers, with lengths already
/// absolutized to px and angles in radians.
fn numeric_args(
    args: &[ComponentValue],
    length: &dyn Fn(&ComponentValue) -> Option<f64>,
) -> Option<Vec<Arg>> {
    args.iter()
        .filter(|a| !matches!(a, ComponentValue::Comma))
        .map(|a| match a {
            ComponentValue::Number(n) => Some(Arg::Number(*n)),
            ComponentValue::Dimension(n, unit) => match angle_radians(*n, unit) {
                Some(rad) => Some(Arg::Angle(rad)),
                None => length(a).map(Arg::Length),
            },
            ComponentValue::Percentage(_) => None,
            _ => length(a).map(Arg::Length),
        })
        .collect()
}

#[derive(Debug, Clone, Copy)]
enum Arg {
    Number(f64),
    Length(f64),
    Angle(f64),
}

impl Arg {
    fn length(self) -> Option<f64> {
        match self {
            Arg::Length(v) => Some(v),
            Arg::Number(v) if v == 0.0 => Some(0.0),
            _ => None,
        }
    }

    fn number(self) -> Option<f64> {
        match self {
            Arg::Number(v) => Some(v),
            _ => None,
        }
    }

    fn angle(self) -> Option<f64> {
        match self {
            Arg::Angle(v) => Some(v),
            Arg::Number(v) if v == 0.0 => Some(0.0),
            _ => None,
        }
    }
}

pub(crate) fn angle_radians(value: f64, unit: &str) -> Option<f64> {
    let rad = match unit {
        "deg" => value.to_radians(),
        "rad" => value,
        "grad" => value * std::f64::consts::PI / 200.0,
        "turn" => value * std::f64::consts::TAU,
        _ => return None,
    };
    Some(rad)
}

fn function_matrix(name: &str, args: &[Arg]) -> Option<Matrix> {
    let matrix = match (name, args) {
        ("translate", [x]) => Matrix::translate(x.length()?, 0.0, 0.0),
        ("translate", [x, y]) => Matrix::translate(x.length()?, y.length()?, 0.0),
        ("translatex", [x]) => Matrix::translate(x.length()?, 0.0, 0.0),
        ("translatey", [y]) => Matrix::translate(0.0, y.length()?, 0.0),
        ("translatez", [z]) => Matrix::translate(0.0, 0.0, z.length()?),
        ("translate3d", [x, y, z]) => Matrix::translate(x.length()?, y.length()?, z.length()?),
        ("scale", [s]) => Matrix::scale(s.number()?, s.number()?, 1.0),
        ("scale", [x, y]) => Matrix::scale(x.number()?, y.number()?, 1.0),
        ("scalex", [x]) => Matrix::scale(x.number()?, 1.0, 1.0),
        ("scaley", [y]) => Matrix::scale(1.0, y.number()?, 1.0),
        ("scalez", [z]) => Matrix::scale(1.0, 1.0, z.number()?),
        ("scale3d", [x, y, z]) => Matrix::scale(x.number()?, y.number()?, z.number()?),
        ("rotate" | "rotatez", [a]) => Matrix::rotate(0.0, 0.0, 1.0, a.angle()?)?,
        ("rotatex", [a]) => Matrix::rotate(1.0, 0.0, 0.0, a.angle()?)?,
        ("rotatey", [a]) => Matrix::rotate(0.0, 1.0, 0.0, a.angle()?)?,
        ("rotate3d", [x, y, z, a]) => {
            Matrix::rotate(x.number()?, y.number()?, z.number()?, a.angle()?)?
        }
        ("skew", [x]) => Matrix::skew(x.angle()?, 0.0),
        ("skew", [x, y]) => Matrix::skew(x.angle()?, y.angle()?),
        ("skewx", [x]) => Matrix::skew(x.angle()?, 0.0),
        ("skewy", [y]) => Matrix::skew(0.0, y.angle()?),
        ("matrix", [a, b, c, d, e, f]) => {
            let mut m = Matrix::IDENTITY;
            m.0[0][0] = a.number()?;
            m.0[1][0] = b.number()?;
            m.0[0][1] = c.number()?;
            m.0[1][1] = d.number()?;
            m.0[0][3] = e.number()?;
            m.0[1][3] = f.number()?;
            m
        }
        ("matrix3d", values) if values.len() == 16 => {
            let mut m = Matrix::IDENTITY;
            for (i, v) in values.iter().enumerate() {
                m.0[i % 4][i / 4] = v.number()?;
            }
            m
        }
        ("perspective", [d]) => {
            let mut m = Matrix::IDENTITY;
            let d = d.length()?;
            if d != 0.0 {
                m.0[3][2] = -1.0 / d.max(1.0);
            }
            m
        }
        _ => return None,
    };
    Some(matrix)
}

/// Compose a transform list into one matrix. Unsupported functions and
/// box-relative percentages give `None`, as does `none`.
pub fn compose(
    values: &[ComponentValue],
    length: &dyn Fn(&ComponentValue) -> Option<f64>,
) -> Option<Matrix> {
    if values.is_empty() {
        return None;
    }
    let mut total = Matrix::IDENTITY;
    for value in values {
        let ComponentValue::Function(name, args) = value else {
            return None;
        };
        let args = numeric_args(args, length)?;
        total = total.multiply(&function_matrix(name, &args)?);
    }
    Some(total)
}

/// Rotation angle in degrees encoded by a serialized `matrix()` or
/// `matrix3d()`.
pub fn matrix_rotation_degrees(values: &[ComponentValue]) -> Option<f64> {
    let [ComponentValue::Function(name, args)] = values else {
        return None;
    };
    let numbers: Vec<f64> = args
        .iter()
        .filter_map(|a| match a {
            ComponentValue::Number(n) => Some(*n),
            _ => None,
        })
        .collect();
    match (name.as_str(), numbers.len()) {
        ("matrix", 6) => Some(numbers[1].atan2(numbers[0]).to_degrees()),
        ("matrix3d", 16) => {
            // Column-major: the diagonal sits at 0, 5 and 10. The skew part
            // carries twice the sine along the rotation axis.
            let trace = numbers[0] + numbers[5] + numbers[10];
            let cos = (trace - 1.0) / 2.0;
            let axis = [
                numbers[6] - numbers[9],
                numbers[8] - numbers[2],
                numbers[1] - numbers[4],
            ];
            let sin = axis.iter().map(|c| c * c).sum::<f64>().sqrt() / 2.0;
            Some(sin.atan2(cos).to_degrees())
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::values::parse_value_text;

    fn px(value: &ComponentValue) -> Option<f64> {
        match value {
            ComponentValue::Dimension(n, unit) if unit == "px" => Some(*n),
            _ => None,
        }
    }

    fn matrix_of(text: &str) -> Option<String> {
        compose(&parse_value_text(text), &px).map(|m| m.to_css_string())
    }

    #[test]
    fn test_two_dimensional() {
        assert_eq!(matrix_of("translate(10px, 20px)").unwrap(), "matrix(1, 0, 0, 1, 10, 20)");
        assert_eq!(matrix_of("rotate(90deg)").unwrap(), "matrix(0, 1, -1, 0, 0, 0)");
        assert_eq!(matrix_of("scale(2)").unwrap(), "matrix(2, 0, 0, 2, 0, 0)");
        assert_eq!(
            matrix_of("translateX(5px) rotate(0.25turn)").unwrap(),
            "matrix(0, 1, -1, 0, 5, 0)"
        );
    }

    #[test]
    fn test_three_dimensional() {
        let out = matrix_of("rotate3d(5, 0, 1, 45deg)").unwrap();
        assert!(out.starts_with("matrix3d("));
        let angle = matrix_rotation_degrees(&parse_value_text(&out)).unwrap();
        assert!((angle - 45.0).abs() < 0.01, "angle {angle}");
    }

    #[test]
    fn test_three_dimensional_small_and_large_angles() {
        for expected in [2.0, 90.0, 170.0] {
            let out = matrix_of(&format!("rotate3d(0, 1, 1, {expected}deg)")).unwrap();
            let angle = matrix_rotation_degrees(&parse_value_text(&out)).unwrap();
            assert!((angle - expected).abs() < 0.01, "{expected}: angle {angle}");
        }
    }

    #[test]
    fn test_rotation_extraction() {
        let angle = matrix_rotation_degrees(&parse_value_text("matrix(0, 1, -1, 0, 0, 0)")).unwrap();
        assert!((angle - 90.0).abs() < 1e-9);
        assert_eq!(matrix_rotation_degrees(&parse_value_text("none")), None);
    }

    #[test]
    fn test_unsupported() {
        assert_eq!(matrix_of("translate(50%)"), None);
        assert_eq!(matrix_of("wobble(1)"), None);
        assert_eq!(matrix_of("none"), None);
    }
}
