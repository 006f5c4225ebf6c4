//! Feature pattern recognition: linear rows, bolt circles, 2D grids and
//! mirror symmetry.
//!
//! Detection runs in the fixed order Linear → Circular → Grid → Mirror, and
//! a feature consumed by an earlier pattern is excluded from later
//! detectors (first-detected-wins). Candidate generation iterates features
//! in ascending id order, so results are deterministic for a given input.

use std::collections::BTreeSet;

use nalgebra::{Point3, Vector3};
use tracing::debug;

use machplan_core::{
    Feature, FeatureId, FeaturePattern, FeatureType, MirrorPlane, PatternId, PatternType,
    Tolerances,
};

pub struct PatternRecognizer<'a> {
    tolerances: &'a Tolerances,
}

impl<'a> PatternRecognizer<'a> {
    pub fn new(tolerances: &'a Tolerances) -> Self {
        Self { tolerances }
    }

    /// Detect all patterns over the feature set.
    ///
    /// Output ordering: Linear patterns first, then Circular, Grid, Mirror;
    /// within a type, descending confidence, then ascending lowest member
    /// id. Pattern ids are assigned after ordering.
    pub fn recognize_all(&self, features: &[Feature]) -> Vec<FeaturePattern> {
        let mut consumed: BTreeSet<FeatureId> = BTreeSet::new();
        let mut patterns: Vec<FeaturePattern> = Vec::new();

        for detect in [
            Self::detect_linear as fn(&Self, &[&Feature]) -> Vec<FeaturePattern>,
            Self::detect_circular,
            Self::detect_grid,
            Self::detect_mirror,
        ] {
            for group in Self::groups_by_type(features, &consumed) {
                let found = detect(self, &group);
                for pattern in found {
                    consumed.extend(pattern.feature_ids.iter().copied());
                    patterns.push(pattern);
                }
            }
        }

        patterns.sort_by(|a, b| {
            a.pattern_type
                .cmp(&b.pattern_type)
                .then(
                    b.confidence
                        .partial_cmp(&a.confidence)
                        .unwrap_or(std::cmp::Ordering::Equal),
                )
                .then(a.lowest_member().cmp(&b.lowest_member()))
        });
        for (i, pattern) in patterns.iter_mut().enumerate() {
            pattern.id = PatternId(i as u32);
        }

        debug!(count = patterns.len(), "pattern recognition complete");
        patterns
    }

    /// Group unconsumed features by type, in ascending id order within each
    /// group; groups are emitted in order of their lowest feature id.
    fn groups_by_type<'f>(
        features: &'f [Feature],
        consumed: &BTreeSet<FeatureId>,
    ) -> Vec<Vec<&'f Feature>> {
        let mut seen: Vec<FeatureType> = Vec::new();
        let mut groups: Vec<Vec<&Feature>> = Vec::new();
        let mut sorted: Vec<&Feature> = features
            .iter()
            .filter(|f| !consumed.contains(&f.id))
            .collect();
        sorted.sort_by_key(|f| f.id);
        for feature in sorted {
            match seen.iter().position(|t| *t == feature.feature_type) {
                Some(i) => groups[i].push(feature),
                None => {
                    seen.push(feature.feature_type);
                    groups.push(vec![feature]);
                }
            }
        }
        groups.retain(|g| g.len() >= 2);
        groups
    }

    // ---- Linear ----

    fn detect_linear(&self, group: &[&Feature]) -> Vec<FeaturePattern> {
        let tol = self.tolerances;
        let mut patterns = Vec::new();
        if group.len() < 3 {
            return patterns;
        }

        let mut used: BTreeSet<FeatureId> = BTreeSet::new();

        for i in 0..group.len() {
            if used.contains(&group[i].id) {
                continue;
            }
            'seed: for j in (i + 1)..group.len() {
                if used.contains(&group[j].id) {
                    continue;
                }
                let seed = group[j].center - group[i].center;
                let spacing = seed.norm();
                if spacing < 0.1 {
                    continue;
                }
                let direction = seed / spacing;

                // Members within line-fit tolerance of the seed line.
                let mut members: Vec<&Feature> = Vec::new();
                for candidate in group {
                    if used.contains(&candidate.id) {
                        continue;
                    }
                    let offset = candidate.center - group[i].center;
                    let along = offset.dot(&direction);
                    let residual = (offset - direction * along).norm();
                    if residual <= tol.line_fit_mm {
                        members.push(candidate);
                    }
                }
                if members.len() < 3 {
                    continue;
                }

                // Order along the line and verify consistent spacing.
                members.sort_by(|a, b| {
                    let pa = (a.center - group[i].center).dot(&direction);
                    let pb = (b.center - group[i].center).dot(&direction);
                    pa.partial_cmp(&pb).unwrap_or(std::cmp::Ordering::Equal)
                });
                let spacings: Vec<f64> = members
                    .windows(2)
                    .map(|w| (w[1].center - w[0].center).norm())
                    .collect();
                let mean = spacings.iter().sum::<f64>() / spacings.len() as f64;
                for s in &spacings {
                    if (s - mean).abs() > tol.position_mm {
                        continue 'seed;
                    }
                }
                let stdev = Self::stdev(&spacings, mean);
                let max_residual = members
                    .iter()
                    .map(|m| {
                        let offset = m.center - group[i].center;
                        (offset - direction * offset.dot(&direction)).norm()
                    })
                    .fold(0.0_f64, f64::max);

                // Spacing consistency and line-fit residual both erode
                // confidence; a perfect row scores 1.0.
                let confidence = ((1.0 - stdev / mean.max(1e-9))
                    * (1.0 - max_residual / tol.line_fit_mm.max(1e-9) * 0.5))
                    .clamp(0.0, 1.0);

                let ids: Vec<FeatureId> = members.iter().map(|m| m.id).collect();
                used.extend(ids.iter().copied());

                let mut pattern =
                    FeaturePattern::new(PatternId(0), PatternType::Linear, ids);
                pattern.spacing = Some(mean);
                pattern.direction = Some(direction);
                pattern.confidence = confidence;
                patterns.push(pattern);
                break;
            }
        }

        patterns
    }

    // ---- Circular ----

    /// Angular-increment scatter above which a candidate circle is treated
    /// as a coincidence rather than a bolt circle. Without this gate every
    /// non-collinear triple would qualify (three points always lie exactly
    /// on their circumcircle) and, under first-detected-wins, starve the
    /// grid and mirror detectors.
    const MAX_ANGLE_STDEV_DEG: f64 = 10.0;

    fn detect_circular(&self, group: &[&Feature]) -> Vec<FeaturePattern> {
        let tol = self.tolerances;
        if group.len() < 3 {
            return Vec::new();
        }

        struct Circle {
            members: Vec<usize>,
            center: Point3<f64>,
            radius: f64,
            mean_increment_deg: f64,
            increment_stdev_deg: f64,
        }

        // Best candidate circle: the regular one explaining the most
        // features; ties resolved by earliest seed combination.
        let mut best: Option<Circle> = None;

        for i in 0..group.len() {
            for j in (i + 1)..group.len() {
                for k in (j + 1)..group.len() {
                    let Some(center) = Self::circumcenter_xy(
                        &group[i].center,
                        &group[j].center,
                        &group[k].center,
                    ) else {
                        continue;
                    };
                    let radius = (group[i].center - center).norm();
                    if radius < 0.1 {
                        continue;
                    }
                    let mut members: Vec<usize> = (0..group.len())
                        .filter(|&m| {
                            ((group[m].center - center).norm() - radius).abs() <= tol.radius_mm
                        })
                        .collect();
                    if members.len() < 3 {
                        continue;
                    }

                    // Order by polar angle about the circle center.
                    let angle = |m: usize| {
                        (group[m].center.y - center.y).atan2(group[m].center.x - center.x)
                    };
                    members.sort_by(|&a, &b| {
                        angle(a)
                            .partial_cmp(&angle(b))
                            .unwrap_or(std::cmp::Ordering::Equal)
                    });
                    let angles: Vec<f64> =
                        members.iter().map(|&m| angle(m).to_degrees()).collect();
                    let mut increments: Vec<f64> = angles.windows(2).map(|w| w[1] - w[0]).collect();
                    increments.push(360.0 - (angles[angles.len() - 1] - angles[0]));
                    let mean_inc = increments.iter().sum::<f64>() / increments.len() as f64;
                    let inc_stdev = Self::stdev(&increments, mean_inc);
                    if inc_stdev > Self::MAX_ANGLE_STDEV_DEG {
                        continue;
                    }

                    if best
                        .as_ref()
                        .is_none_or(|b| members.len() > b.members.len())
                    {
                        best = Some(Circle {
                            members,
                            center,
                            radius,
                            mean_increment_deg: mean_inc,
                            increment_stdev_deg: inc_stdev,
                        });
                    }
                }
            }
        }

        let Some(circle) = best else {
            return Vec::new();
        };

        let confidence = if circle.increment_stdev_deg <= tol.angle_deg {
            1.0
        } else {
            (1.0 - (circle.increment_stdev_deg - tol.angle_deg) / 45.0).clamp(0.0, 1.0)
        };

        let ids: Vec<FeatureId> = circle.members.iter().map(|&m| group[m].id).collect();
        let mut pattern = FeaturePattern::new(PatternId(0), PatternType::Circular, ids);
        pattern.center = Some(circle.center);
        pattern.radius = Some(circle.radius);
        pattern.angle_increment_deg = Some(circle.mean_increment_deg);
        pattern.confidence = confidence;
        vec![pattern]
    }

    /// Circumcenter of three points projected to the XY plane; Z is their
    /// average. `None` for collinear points.
    fn circumcenter_xy(
        p1: &Point3<f64>,
        p2: &Point3<f64>,
        p3: &Point3<f64>,
    ) -> Option<Point3<f64>> {
        let (x1, y1) = (p1.x, p1.y);
        let (x2, y2) = (p2.x, p2.y);
        let (x3, y3) = (p3.x, p3.y);

        let d = 2.0 * (x1 * (y2 - y3) + x2 * (y3 - y1) + x3 * (y1 - y2));
        if d.abs() < 1e-3 {
            return None;
        }
        let sq = |x: f64, y: f64| x * x + y * y;
        let ux = (sq(x1, y1) * (y2 - y3) + sq(x2, y2) * (y3 - y1) + sq(x3, y3) * (y1 - y2)) / d;
        let uy = (sq(x1, y1) * (x3 - x2) + sq(x2, y2) * (x1 - x3) + sq(x3, y3) * (x2 - x1)) / d;
        Some(Point3::new(ux, uy, (p1.z + p2.z + p3.z) / 3.0))
    }

    // ---- Grid ----

    fn detect_grid(&self, group: &[&Feature]) -> Vec<FeaturePattern> {
        let tol = self.tolerances;
        if group.len() < 4 {
            return Vec::new();
        }

        let xs: Vec<f64> = group.iter().map(|f| f.center.x).collect();
        let ys: Vec<f64> = group.iter().map(|f| f.center.y).collect();

        let col_centers = Self::cluster_1d(&xs, tol.position_mm);
        let row_centers = Self::cluster_1d(&ys, tol.position_mm);
        if col_centers.len() < 2 || row_centers.len() < 2 {
            return Vec::new();
        }

        let Some((col_spacing, col_stdev)) = Self::uniform_spacing(&col_centers, tol.position_mm)
        else {
            return Vec::new();
        };
        let Some((row_spacing, row_stdev)) = Self::uniform_spacing(&row_centers, tol.position_mm)
        else {
            return Vec::new();
        };

        // Keep features sitting on a row/column intersection.
        let on_axis = |v: f64, centers: &[f64]| {
            centers.iter().any(|c| (v - c).abs() <= tol.position_mm)
        };
        let mut members: Vec<&Feature> = group
            .iter()
            .filter(|f| on_axis(f.center.x, &col_centers) && on_axis(f.center.y, &row_centers))
            .copied()
            .collect();
        if members.len() < 4 {
            return Vec::new();
        }
        // Grid scan order: by row, then column.
        members.sort_by(|a, b| {
            (a.center.y, a.center.x)
                .partial_cmp(&(b.center.y, b.center.x))
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let explained = members.len() as f64 / group.len() as f64;
        let regularity =
            1.0 - (col_stdev + row_stdev) / (col_spacing + row_spacing).max(1e-9);
        let confidence = (explained * regularity).clamp(0.0, 1.0);

        let ids: Vec<FeatureId> = members.iter().map(|m| m.id).collect();
        let mut pattern = FeaturePattern::new(PatternId(0), PatternType::Grid, ids);
        pattern.rows = Some(row_centers.len());
        pattern.columns = Some(col_centers.len());
        pattern.row_spacing = Some(row_spacing);
        pattern.column_spacing = Some(col_spacing);
        pattern.spacing = Some(col_spacing.min(row_spacing));
        pattern.confidence = confidence;
        vec![pattern]
    }

    /// Cluster scalar values within a tolerance; returns sorted cluster
    /// means.
    fn cluster_1d(values: &[f64], tolerance: f64) -> Vec<f64> {
        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        let mut clusters: Vec<Vec<f64>> = Vec::new();
        for v in sorted {
            match clusters.last_mut() {
                Some(cluster)
                    if (v - cluster.iter().sum::<f64>() / cluster.len() as f64).abs()
                        <= tolerance =>
                {
                    cluster.push(v)
                }
                _ => clusters.push(vec![v]),
            }
        }
        clusters
            .iter()
            .map(|c| c.iter().sum::<f64>() / c.len() as f64)
            .collect()
    }

    /// Mean consecutive spacing if all gaps agree within the tolerance.
    fn uniform_spacing(centers: &[f64], tolerance: f64) -> Option<(f64, f64)> {
        if centers.len() < 2 {
            return None;
        }
        let gaps: Vec<f64> = centers.windows(2).map(|w| w[1] - w[0]).collect();
        let mean = gaps.iter().sum::<f64>() / gaps.len() as f64;
        if gaps.iter().any(|g| (g - mean).abs() > tolerance) {
            return None;
        }
        Some((mean, Self::stdev(&gaps, mean)))
    }

    // ---- Mirror ----

    fn detect_mirror(&self, group: &[&Feature]) -> Vec<FeaturePattern> {
        let tol = self.tolerances;
        if group.len() < 4 {
            return Vec::new();
        }

        // Evaluate all three canonical planes; the one pairing the most
        // features wins (ties keep the earlier plane in this order).
        let planes = [MirrorPlane::Yz, MirrorPlane::Xz, MirrorPlane::Xy];
        let mut best: Option<(MirrorPlane, Vec<(usize, usize)>)> = None;

        for plane in planes {
            let axis = plane.flip_axis();
            let mut paired: BTreeSet<usize> = BTreeSet::new();
            let mut pairs: Vec<(usize, usize)> = Vec::new();

            for i in 0..group.len() {
                if paired.contains(&i) {
                    continue;
                }
                // Features lying on the plane mirror onto themselves; skip.
                if group[i].center.coords[axis].abs() <= tol.position_mm {
                    continue;
                }
                let mut reflected = group[i].center;
                reflected.coords[axis] = -reflected.coords[axis];

                for j in (i + 1)..group.len() {
                    if paired.contains(&j) {
                        continue;
                    }
                    if (group[j].center - reflected).norm() <= tol.position_mm {
                        pairs.push((i, j));
                        paired.insert(i);
                        paired.insert(j);
                        break;
                    }
                }
            }

            if pairs.len() >= 2
                && best.as_ref().is_none_or(|(_, b)| pairs.len() > b.len())
            {
                best = Some((plane, pairs));
            }
        }

        let Some((plane, pairs)) = best else {
            return Vec::new();
        };

        let mut ids: Vec<FeatureId> = Vec::with_capacity(pairs.len() * 2);
        for (i, j) in &pairs {
            ids.push(group[*i].id);
            ids.push(group[*j].id);
        }
        // Pairing completeness drives confidence.
        let confidence = (ids.len() as f64 / group.len() as f64).clamp(0.0, 1.0);

        let mut pattern = FeaturePattern::new(PatternId(0), PatternType::Mirror, ids);
        pattern.mirror_plane = Some(plane);
        pattern.direction = Some(match plane {
            MirrorPlane::Yz => Vector3::x(),
            MirrorPlane::Xz => Vector3::y(),
            MirrorPlane::Xy => Vector3::z(),
        });
        pattern.confidence = confidence;
        vec![pattern]
    }

    fn stdev(values: &[f64], mean: f64) -> f64 {
        if values.is_empty() {
            return 0.0;
        }
        let var =
            values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / values.len() as f64;
        var.sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use machplan_core::FeatureType;

    fn hole(id: u32, x: f64, y: f64) -> Feature {
        Feature::new(FeatureId(id), FeatureType::ThroughHole)
            .with_diameter(6.0)
            .with_depth(10.0)
            .with_center(x, y, 0.0)
    }

    #[test]
    fn test_linear_row_detected_with_high_confidence() {
        let tol = Tolerances::default();
        let recognizer = PatternRecognizer::new(&tol);
        let features: Vec<Feature> =
            (0..5).map(|i| hole(i, i as f64 * 20.0, 0.0)).collect();

        let patterns = recognizer.recognize_all(&features);
        assert_eq!(patterns.len(), 1);
        let p = &patterns[0];
        assert_eq!(p.pattern_type, PatternType::Linear);
        assert_eq!(p.member_count(), 5);
        assert!((p.spacing.unwrap() - 20.0).abs() < 0.1);
        assert!(p.confidence >= 0.95, "confidence {}", p.confidence);
    }

    #[test]
    fn test_bolt_circle_eight_holes() {
        let tol = Tolerances::default();
        let recognizer = PatternRecognizer::new(&tol);
        let features: Vec<Feature> = (0..8)
            .map(|i| {
                let a = (i as f64) * 45.0_f64.to_radians();
                hole(i, 50.0 * a.cos(), 50.0 * a.sin())
            })
            .collect();

        let patterns = recognizer.recognize_all(&features);
        let circular: Vec<_> = patterns
            .iter()
            .filter(|p| p.pattern_type == PatternType::Circular)
            .collect();
        assert_eq!(circular.len(), 1);
        let p = circular[0];
        assert_eq!(p.member_count(), 8);
        assert!((p.radius.unwrap() - 50.0).abs() < 0.1);
        assert!((p.angle_increment_deg.unwrap() - 45.0).abs() < 0.5);
        assert!(p.confidence >= 0.99);
    }

    #[test]
    fn test_grid_detector_three_by_three() {
        let tol = Tolerances::default();
        let recognizer = PatternRecognizer::new(&tol);
        let mut features = Vec::new();
        let mut id = 0;
        for row in 0..3 {
            for col in 0..3 {
                features.push(hole(id, col as f64 * 15.0, row as f64 * 12.0));
                id += 1;
            }
        }
        let group: Vec<&Feature> = features.iter().collect();

        let grid = recognizer.detect_grid(&group);
        assert_eq!(grid.len(), 1);
        let p = &grid[0];
        assert_eq!(p.member_count(), 9);
        assert_eq!(p.rows, Some(3));
        assert_eq!(p.columns, Some(3));
        assert!((p.column_spacing.unwrap() - 15.0).abs() < 0.1);
        assert!((p.row_spacing.unwrap() - 12.0).abs() < 0.1);
    }

    #[test]
    fn test_regular_grid_consumed_as_rows() {
        // Under first-detected-wins a fully regular 3x3 grid is explained
        // by the linear detector first, one pattern per row.
        let tol = Tolerances::default();
        let recognizer = PatternRecognizer::new(&tol);
        let mut features = Vec::new();
        let mut id = 0;
        for row in 0..3 {
            for col in 0..3 {
                features.push(hole(id, col as f64 * 15.0, row as f64 * 12.0));
                id += 1;
            }
        }

        let patterns = recognizer.recognize_all(&features);
        assert!(patterns
            .iter()
            .all(|p| p.pattern_type == PatternType::Linear));
        let covered: usize = patterns.iter().map(|p| p.member_count()).sum();
        assert_eq!(covered, 9);
    }

    #[test]
    fn test_rectangle_detected_as_two_by_two_grid() {
        // Four holes at rectangle corners: no row of three for the linear
        // detector, angular increments too uneven for a bolt circle.
        let tol = Tolerances::default();
        let recognizer = PatternRecognizer::new(&tol);
        let features = vec![
            hole(0, 0.0, 0.0),
            hole(1, 30.0, 0.0),
            hole(2, 0.0, 24.0),
            hole(3, 30.0, 24.0),
        ];

        let patterns = recognizer.recognize_all(&features);
        assert_eq!(patterns.len(), 1);
        let p = &patterns[0];
        assert_eq!(p.pattern_type, PatternType::Grid);
        assert_eq!(p.rows, Some(2));
        assert_eq!(p.columns, Some(2));
        assert!((p.column_spacing.unwrap() - 30.0).abs() < 0.1);
        assert!((p.row_spacing.unwrap() - 24.0).abs() < 0.1);
    }

    #[test]
    fn test_mirror_pairs_across_yz_plane() {
        // Pairs at different offsets from the plane so neither the grid
        // nor the circular detector claims them first.
        let tol = Tolerances::default();
        let recognizer = PatternRecognizer::new(&tol);
        let features = vec![
            hole(0, -30.0, 10.0),
            hole(1, 30.0, 10.0),
            hole(2, -12.0, 42.0),
            hole(3, 12.0, 42.0),
        ];

        let patterns = recognizer.recognize_all(&features);
        let mirror: Vec<_> = patterns
            .iter()
            .filter(|p| p.pattern_type == PatternType::Mirror)
            .collect();
        assert_eq!(mirror.len(), 1);
        let p = mirror[0];
        assert_eq!(p.mirror_plane, Some(MirrorPlane::Yz));
        assert_eq!(p.member_count(), 4);
        assert!((p.confidence - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_first_match_wins_row_not_reused_by_mirror() {
        // A symmetric row is consumed by the linear detector first; the
        // mirror detector must not see those features again.
        let tol = Tolerances::default();
        let recognizer = PatternRecognizer::new(&tol);
        let features: Vec<Feature> = (0..4)
            .map(|i| hole(i, -30.0 + i as f64 * 20.0, 0.0))
            .collect();

        let patterns = recognizer.recognize_all(&features);
        assert_eq!(patterns.len(), 1);
        assert_eq!(patterns[0].pattern_type, PatternType::Linear);
    }

    #[test]
    fn test_different_types_do_not_mix() {
        let tol = Tolerances::default();
        let recognizer = PatternRecognizer::new(&tol);
        let mut features: Vec<Feature> =
            (0..2).map(|i| hole(i, i as f64 * 20.0, 0.0)).collect();
        features.push(
            Feature::new(FeatureId(2), FeatureType::CircularPocket)
                .with_diameter(20.0)
                .with_depth(5.0)
                .with_center(40.0, 0.0, 0.0),
        );
        // Only 2 holes + 1 pocket on the line: no pattern from either type.
        assert!(recognizer.recognize_all(&features).is_empty());
    }

    #[test]
    fn test_irregular_spacing_lowers_confidence() {
        let tol = Tolerances::default();
        let recognizer = PatternRecognizer::new(&tol);
        let features = vec![
            hole(0, 0.0, 0.0),
            hole(1, 20.0, 0.0),
            hole(2, 40.4, 0.0),
            hole(3, 60.0, 0.0),
        ];
        let patterns = recognizer.recognize_all(&features);
        assert_eq!(patterns.len(), 1);
        assert!(patterns[0].confidence < 1.0);
        assert!(patterns[0].confidence > 0.5);
    }

    #[test]
    fn test_pattern_ids_sequential_after_ordering() {
        let tol = Tolerances::default();
        let recognizer = PatternRecognizer::new(&tol);
        // A row of slots plus a bolt circle of holes.
        let mut features: Vec<Feature> = (0..8)
            .map(|i| {
                let a = (i as f64) * 45.0_f64.to_radians();
                hole(i, 50.0 * a.cos(), 50.0 * a.sin())
            })
            .collect();
        for i in 0..3 {
            features.push(
                Feature::new(FeatureId(10 + i), FeatureType::Slot)
                    .with_size(4.0, 20.0)
                    .with_depth(3.0)
                    .with_center(100.0 + i as f64 * 25.0, 0.0, 0.0),
            );
        }

        let patterns = recognizer.recognize_all(&features);
        assert_eq!(patterns.len(), 2);
        assert_eq!(patterns[0].id, PatternId(0));
        assert_eq!(patterns[1].id, PatternId(1));
        // Linear ordered before Circular.
        assert_eq!(patterns[0].pattern_type, PatternType::Linear);
        assert_eq!(patterns[1].pattern_type, PatternType::Circular);
    }
}
