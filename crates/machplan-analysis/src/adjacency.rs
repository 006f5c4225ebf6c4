//! Feature relationship analysis and setup grouping.
//!
//! Relationships are derived purely from feature centers and spherical
//! bounding extents. Connected components over the relationship graph,
//! split by shared access direction, become candidate machining setups.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use tracing::debug;

use machplan_core::{
    AccessDirection, Feature, FeatureGraph, FeatureId, FeatureRelationship, GraphNode,
    RelationshipKind, Setup, Tolerances,
};

pub struct AdjacencyAnalyzer<'a> {
    tolerances: &'a Tolerances,
}

impl<'a> AdjacencyAnalyzer<'a> {
    pub fn new(tolerances: &'a Tolerances) -> Self {
        Self { tolerances }
    }

    /// Pairwise relationship detection over the feature set.
    ///
    /// Precedence per pair: proximity first, then containment, then
    /// overlap; a contained subtractive feature inside a protrusion is
    /// additionally reported as parent-child. Symmetric edges are stored
    /// with the lower feature id as source.
    pub fn analyze(&self, features: &[Feature]) -> Vec<FeatureRelationship> {
        let proximity = self.tolerances.proximity_mm;
        let mut relationships = Vec::new();

        for i in 0..features.len() {
            for j in (i + 1)..features.len() {
                let (a, b) = Self::ordered_pair(&features[i], &features[j]);
                let distance = (a.center - b.center).norm();
                let ra = a.bounding_radius();
                let rb = b.bounding_radius();

                if distance < proximity {
                    relationships.push(FeatureRelationship {
                        source: a.id,
                        target: b.id,
                        kind: RelationshipKind::Adjacent,
                        strength: 1.0 - distance / proximity,
                        note: format!("Distance: {distance:.1}mm"),
                    });
                } else if Self::contains(distance, ra, rb) || Self::contains(distance, rb, ra) {
                    let (outer, inner) = if ra >= rb { (a, b) } else { (b, a) };
                    relationships.push(FeatureRelationship {
                        source: a.id,
                        target: b.id,
                        kind: RelationshipKind::Contained,
                        strength: 1.0,
                        note: format!("{} encloses {}", outer.id, inner.id),
                    });
                    // A cut made into a boss exists only by reference to it.
                    if !outer.feature_type.is_subtractive() && inner.feature_type.is_subtractive()
                    {
                        relationships.push(FeatureRelationship {
                            source: outer.id,
                            target: inner.id,
                            kind: RelationshipKind::ParentChild,
                            strength: 1.0,
                            note: format!("{} machined relative to {}", inner.id, outer.id),
                        });
                    }
                } else if distance < ra + rb {
                    relationships.push(FeatureRelationship {
                        source: a.id,
                        target: b.id,
                        kind: RelationshipKind::Overlapping,
                        strength: 0.8,
                        note: format!("Distance: {distance:.1}mm"),
                    });
                }
            }
        }

        debug!(
            features = features.len(),
            relationships = relationships.len(),
            "adjacency analysis complete"
        );
        relationships
    }

    pub fn build_graph(&self, features: &[Feature]) -> FeatureGraph {
        let nodes = features
            .iter()
            .map(|f| GraphNode {
                id: f.id,
                feature_type: f.feature_type,
                depth: f.depth,
                diameter: f.diameter,
            })
            .collect();
        FeatureGraph {
            nodes,
            edges: self.analyze(features),
        }
    }

    /// Connected components of the relationship graph, each as a sorted
    /// list of member ids. Singleton components are omitted.
    pub fn clusters(&self, features: &[Feature]) -> Vec<Vec<FeatureId>> {
        let edges = self.analyze(features);
        let mut neighbors: BTreeMap<FeatureId, Vec<FeatureId>> = BTreeMap::new();
        for edge in &edges {
            neighbors.entry(edge.source).or_default().push(edge.target);
            neighbors.entry(edge.target).or_default().push(edge.source);
        }

        let mut visited: BTreeSet<FeatureId> = BTreeSet::new();
        let mut clusters = Vec::new();
        let mut ids: Vec<FeatureId> = features.iter().map(|f| f.id).collect();
        ids.sort();

        for start in ids {
            if visited.contains(&start) {
                continue;
            }
            let mut component = vec![start];
            visited.insert(start);
            let mut queue = VecDeque::from([start]);
            while let Some(current) = queue.pop_front() {
                if let Some(adjacent) = neighbors.get(&current) {
                    for &next in adjacent {
                        if visited.insert(next) {
                            component.push(next);
                            queue.push_back(next);
                        }
                    }
                }
            }
            if component.len() > 1 {
                component.sort();
                clusters.push(component);
            }
        }
        clusters
    }

    /// Group features into machining setups: every connected component is
    /// split by quantized access direction, features unrelated to any other
    /// land in the setup matching their direction too. Setups are numbered
    /// in order of first appearance.
    pub fn group_setups(&self, features: &[Feature]) -> Vec<Setup> {
        let clusters = self.clusters(features);
        let clustered: BTreeSet<FeatureId> =
            clusters.iter().flatten().copied().collect();

        let by_id: BTreeMap<FeatureId, &Feature> =
            features.iter().map(|f| (f.id, f)).collect();

        let mut setups: Vec<Setup> = Vec::new();
        let mut push_group = |members: &[FeatureId], setups: &mut Vec<Setup>| {
            let mut buckets: Vec<(AccessDirection, Vec<FeatureId>)> = Vec::new();
            for &id in members {
                let direction = AccessDirection::from_axis(&by_id[&id].axis);
                match buckets.iter_mut().find(|(d, _)| *d == direction) {
                    Some((_, ids)) => ids.push(id),
                    None => buckets.push((direction, vec![id])),
                }
            }
            for (direction, ids) in buckets {
                setups.push(Setup {
                    id: setups.len() as u32,
                    feature_ids: ids,
                    access_direction: direction,
                });
            }
        };

        for cluster in &clusters {
            push_group(cluster, &mut setups);
        }
        let mut loose: Vec<FeatureId> = features
            .iter()
            .map(|f| f.id)
            .filter(|id| !clustered.contains(id))
            .collect();
        loose.sort();
        if !loose.is_empty() {
            push_group(&loose, &mut setups);
        }

        debug!(setups = setups.len(), "setup grouping complete");
        setups
    }

    fn ordered_pair<'f>(a: &'f Feature, b: &'f Feature) -> (&'f Feature, &'f Feature) {
        if a.id <= b.id {
            (a, b)
        } else {
            (b, a)
        }
    }

    /// Spherical containment: `inner` fully inside `outer`.
    fn contains(distance: f64, outer_radius: f64, inner_radius: f64) -> bool {
        outer_radius > 0.0 && distance + inner_radius <= outer_radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use machplan_core::FeatureType;
    use nalgebra::Vector3;

    fn hole_at(id: u32, x: f64, y: f64) -> Feature {
        Feature::new(FeatureId(id), FeatureType::ThroughHole)
            .with_diameter(5.0)
            .with_depth(10.0)
            .with_center(x, y, 0.0)
    }

    #[test]
    fn test_adjacent_strength_decreases_with_distance() {
        let tol = Tolerances::default();
        let analyzer = AdjacencyAnalyzer::new(&tol);
        let features = vec![hole_at(0, 0.0, 0.0), hole_at(1, 4.0, 0.0)];

        let rels = analyzer.analyze(&features);
        assert_eq!(rels.len(), 1);
        assert_eq!(rels[0].kind, RelationshipKind::Adjacent);
        assert!((rels[0].strength - 0.2).abs() < 1e-9);
        assert_eq!(rels[0].source, FeatureId(0));
        assert_eq!(rels[0].target, FeatureId(1));
    }

    #[test]
    fn test_distant_features_unrelated() {
        let tol = Tolerances::default();
        let analyzer = AdjacencyAnalyzer::new(&tol);
        let features = vec![hole_at(0, 0.0, 0.0), hole_at(1, 80.0, 0.0)];
        assert!(analyzer.analyze(&features).is_empty());
    }

    #[test]
    fn test_hole_in_boss_is_parent_child() {
        let tol = Tolerances::default();
        let analyzer = AdjacencyAnalyzer::new(&tol);
        let boss = Feature::new(FeatureId(0), FeatureType::CircularBoss)
            .with_diameter(40.0)
            .with_height(12.0)
            .with_center(0.0, 0.0, 0.0);
        let hole = Feature::new(FeatureId(1), FeatureType::ThroughHole)
            .with_diameter(6.0)
            .with_depth(12.0)
            .with_center(10.0, 0.0, 0.0);

        let rels = analyzer.analyze(&[boss, hole]);
        let kinds: Vec<RelationshipKind> = rels.iter().map(|r| r.kind).collect();
        assert!(kinds.contains(&RelationshipKind::Contained));
        assert!(kinds.contains(&RelationshipKind::ParentChild));
        let pc = rels
            .iter()
            .find(|r| r.kind == RelationshipKind::ParentChild)
            .unwrap();
        assert_eq!(pc.source, FeatureId(0));
        assert_eq!(pc.target, FeatureId(1));
        assert!((pc.strength - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_overlapping_extents() {
        let tol = Tolerances::default();
        let analyzer = AdjacencyAnalyzer::new(&tol);
        let a = Feature::new(FeatureId(0), FeatureType::CircularPocket)
            .with_diameter(20.0)
            .with_depth(5.0)
            .with_center(0.0, 0.0, 0.0);
        let b = Feature::new(FeatureId(1), FeatureType::CircularPocket)
            .with_diameter(20.0)
            .with_depth(5.0)
            .with_center(15.0, 0.0, 0.0);

        let rels = analyzer.analyze(&[a, b]);
        assert_eq!(rels.len(), 1);
        assert_eq!(rels[0].kind, RelationshipKind::Overlapping);
        assert!((rels[0].strength - 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_clusters_are_connected_components() {
        let tol = Tolerances::default();
        let analyzer = AdjacencyAnalyzer::new(&tol);
        // Chain 0-1-2 plus an isolated feature 3.
        let features = vec![
            hole_at(0, 0.0, 0.0),
            hole_at(1, 4.0, 0.0),
            hole_at(2, 8.0, 0.0),
            hole_at(3, 100.0, 0.0),
        ];

        let clusters = analyzer.clusters(&features);
        assert_eq!(clusters.len(), 1);
        assert_eq!(
            clusters[0],
            vec![FeatureId(0), FeatureId(1), FeatureId(2)]
        );
    }

    #[test]
    fn test_setups_split_by_access_direction() {
        let tol = Tolerances::default();
        let analyzer = AdjacencyAnalyzer::new(&tol);
        let mut top = hole_at(0, 0.0, 0.0);
        top.axis = Vector3::z();
        let mut side = hole_at(1, 4.0, 0.0);
        side.axis = Vector3::x();

        let setups = analyzer.group_setups(&[top, side]);
        assert_eq!(setups.len(), 2);
        assert_eq!(setups[0].access_direction, AccessDirection::Top);
        assert_eq!(setups[0].feature_ids, vec![FeatureId(0)]);
        assert_eq!(setups[1].access_direction, AccessDirection::Side);
        assert_eq!(setups[1].feature_ids, vec![FeatureId(1)]);
    }

    #[test]
    fn test_graph_nodes_mirror_features() {
        let tol = Tolerances::default();
        let analyzer = AdjacencyAnalyzer::new(&tol);
        let features = vec![hole_at(0, 0.0, 0.0), hole_at(1, 4.0, 0.0)];

        let graph = analyzer.build_graph(&features);
        assert_eq!(graph.nodes.len(), 2);
        assert_eq!(graph.edges.len(), 1);
        assert_eq!(graph.nodes[0].diameter, Some(5.0));
    }
}
