//! Measure a single joint angle.

use postura_analysis_core::angle_at;
use postura_pose_model::Point2D;

pub fn run(vertex: Point2D, a: Point2D, b: Point2D) -> anyhow::Result<()> {
    let degrees = angle_at(vertex, a, b).map_err(|e| anyhow::anyhow!("Cannot measure: {e}"))?;
    println!("{degrees:.2}");
    Ok(())
}

/// Parse `x,y` into a point.
pub fn parse_point(s: &str) -> Result<Point2D, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected `x,y`, got `{s}`"))?;
    let x: f64 = x
        .trim()
        .parse()
        .map_err(|e| format!("invalid x in `{s}`: {e}"))?;
    let y: f64 = y
        .trim()
        .parse()
        .map_err(|e| format!("invalid y in `{s}`: {e}"))?;
    Ok(Point2D::new(x, y))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_signed_coordinates() {
        assert_eq!(parse_point("-1.5, 2").unwrap(), Point2D::new(-1.5, 2.0));
        assert!(parse_point("3").is_err());
        assert!(parse_point("a,1").is_err());
    }
}
