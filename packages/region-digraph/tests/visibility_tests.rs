//! Visibility algorithm tests: isolation defaults, filtered single-hop and
//! multi-hop admission, cyclic topologies, and the privileged origins.

use pretty_assertions::assert_eq;

use region_digraph::{
    AttributeMatch, Candidate, CapabilityRef, ModuleIdentity, Origin, RegionDigraph, RegionFilter,
    VisibilityResolver,
};

fn id(s: &str) -> ModuleIdentity {
    ModuleIdentity::parse(s).unwrap()
}

fn region(name: &str) -> Origin {
    Origin::Region(name.to_string())
}

fn visible(digraph: &RegionDigraph, origin: &Origin, candidate: &Candidate) -> bool {
    VisibilityResolver::is_visible(&digraph.snapshot(), origin, candidate)
}

#[test]
fn same_region_visibility_is_unconditional() {
    let digraph = RegionDigraph::new();
    digraph.create_region("a").unwrap();
    digraph.add_module("a", id("m@1.0.0")).unwrap();

    // No edges at all, and still visible to its own region.
    assert!(visible(&digraph, &region("a"), &id("m@1.0.0").into()));
}

#[test]
fn regions_without_edges_are_isolated() {
    let digraph = RegionDigraph::new();
    digraph.create_region("a").unwrap();
    digraph.create_region("b").unwrap();
    digraph.add_module("a", id("in-a@1.0.0")).unwrap();
    digraph.add_module("b", id("in-b@1.0.0")).unwrap();

    assert!(!visible(&digraph, &region("a"), &id("in-b@1.0.0").into()));
    assert!(!visible(&digraph, &region("b"), &id("in-a@1.0.0").into()));
}

#[test]
fn single_hop_admission_is_per_identity() {
    let digraph = RegionDigraph::new();
    digraph.create_region("a").unwrap();
    digraph.create_region("b").unwrap();
    digraph.add_module("b", id("wanted@1.0.0")).unwrap();
    digraph.add_module("b", id("other@1.0.0")).unwrap();

    let filter = RegionFilter::builder().allow(id("wanted@1.0.0")).build();
    digraph.connect("a", "b", filter).unwrap();

    assert!(visible(&digraph, &region("a"), &id("wanted@1.0.0").into()));
    assert!(!visible(&digraph, &region("a"), &id("other@1.0.0").into()));
    // Direction matters: b gained nothing toward a.
    assert!(!visible(&digraph, &region("b"), &id("wanted@1.0.0").into()));
}

#[test]
fn multi_hop_requires_admission_at_every_hop() {
    // a -> b admits x and y; b -> c admits only x. x lives in c, y in b.
    let digraph = RegionDigraph::new();
    digraph.create_region("a").unwrap();
    digraph.create_region("b").unwrap();
    digraph.create_region("c").unwrap();
    digraph.add_module("c", id("x@1.0.0")).unwrap();
    digraph.add_module("b", id("y@1.0.0")).unwrap();

    let first = RegionFilter::builder()
        .allow(id("x@1.0.0"))
        .allow(id("y@1.0.0"))
        .build();
    let second = RegionFilter::builder().allow(id("x@1.0.0")).build();
    digraph.connect("a", "b", first).unwrap();
    digraph.connect("b", "c", second).unwrap();

    // x is admitted by both hops and owned by c: visible from a.
    assert!(visible(&digraph, &region("a"), &id("x@1.0.0").into()));
    // y is admitted at the first hop and owned by b: visible from a.
    assert!(visible(&digraph, &region("a"), &id("y@1.0.0").into()));

    // An identity owned by c but only admitted by the first hop stays
    // invisible even though c is structurally reachable.
    digraph.add_module("c", id("z@1.0.0")).unwrap();
    digraph.disconnect("a", "b");
    let first = RegionFilter::builder()
        .allow(id("x@1.0.0"))
        .allow(id("z@1.0.0"))
        .build();
    digraph.connect("a", "b", first).unwrap();
    assert!(!visible(&digraph, &region("a"), &id("z@1.0.0").into()));
}

#[test]
fn any_fully_admitting_path_suffices() {
    // Two parallel routes from a to d; only the lower one admits m at every
    // hop. The search must explore both.
    let digraph = RegionDigraph::new();
    for name in ["a", "upper", "lower", "d"] {
        digraph.create_region(name).unwrap();
    }
    digraph.add_module("d", id("m@1.0.0")).unwrap();

    let admit = || RegionFilter::builder().allow(id("m@1.0.0")).build();
    digraph.connect("a", "upper", admit()).unwrap();
    digraph.connect("upper", "d", RegionFilter::closed()).unwrap();
    digraph.connect("a", "lower", admit()).unwrap();
    digraph.connect("lower", "d", admit()).unwrap();

    assert!(visible(&digraph, &region("a"), &id("m@1.0.0").into()));
}

#[test]
fn cyclic_mesh_terminates_with_deterministic_result() {
    // Four regions, fully interconnected (12 directed edges), every filter
    // admitting the probe module: maximal cyclic topology.
    let digraph = RegionDigraph::new();
    let names = ["n0", "n1", "n2", "n3"];
    for name in names {
        digraph.create_region(name).unwrap();
    }
    digraph.add_module("n3", id("probe@1.0.0")).unwrap();
    for tail in names {
        for head in names {
            if tail != head {
                let filter = RegionFilter::builder().allow(id("probe@1.0.0")).build();
                digraph.connect(tail, head, filter).unwrap();
            }
        }
    }

    let snapshot = digraph.snapshot();
    // Repeated queries over a cyclic mesh terminate and agree.
    for _ in 0..10 {
        for name in names {
            let origin = Origin::Region(name.to_string());
            assert!(VisibilityResolver::is_visible(
                &snapshot,
                &origin,
                &id("probe@1.0.0").into(),
            ));
            assert!(!VisibilityResolver::is_visible(
                &snapshot,
                &origin,
                &id("absent@1.0.0").into(),
            ));
        }
    }
}

#[test]
fn cycle_with_closed_edges_stays_isolated() {
    // a -> b -> c -> a, but every filter is closed: reachability without
    // admission yields nothing, and the cycle still terminates.
    let digraph = RegionDigraph::new();
    for name in ["a", "b", "c"] {
        digraph.create_region(name).unwrap();
    }
    digraph.add_module("c", id("m@1.0.0")).unwrap();
    digraph.connect("a", "b", RegionFilter::closed()).unwrap();
    digraph.connect("b", "c", RegionFilter::closed()).unwrap();
    digraph.connect("c", "a", RegionFilter::closed()).unwrap();

    assert!(!visible(&digraph, &region("a"), &id("m@1.0.0").into()));
}

#[test]
fn root_origin_sees_every_candidate_unchanged() {
    let digraph = RegionDigraph::new();
    digraph.create_region("a").unwrap();
    digraph.add_module("a", id("owned@1.0.0")).unwrap();

    let candidates: Vec<Candidate> = vec![
        id("owned@1.0.0").into(),
        id("unowned@1.0.0").into(),
        CapabilityRef::new(id("unowned@1.0.0"))
            .with_attribute("kind", "http")
            .into(),
    ];

    let result =
        VisibilityResolver::filter(&digraph.snapshot(), &Origin::Root, candidates.clone());
    assert_eq!(result, candidates);
}

#[test]
fn unowned_origin_sees_nothing() {
    let digraph = RegionDigraph::new();
    digraph.create_region("a").unwrap();
    digraph.add_module("a", id("m@1.0.0")).unwrap();

    let origin = Origin::Module(id("outsider@1.0.0"));
    let result = VisibilityResolver::filter(
        &digraph.snapshot(),
        &origin,
        vec![id("m@1.0.0").into()],
    );
    assert!(result.is_empty());
}

#[test]
fn unowned_candidates_are_invisible_to_regions() {
    let digraph = RegionDigraph::new();
    digraph.create_region("a").unwrap();

    assert!(!visible(&digraph, &region("a"), &id("stray@1.0.0").into()));
}

#[test]
fn capability_visibility_follows_owner_region_and_predicates() {
    let digraph = RegionDigraph::new();
    digraph.create_region("a").unwrap();
    digraph.create_region("b").unwrap();
    digraph.add_module("b", id("publisher@1.0.0")).unwrap();

    let filter = RegionFilter::builder()
        .capability_match(AttributeMatch::default().with("kind", "http"))
        .build();
    digraph.connect("a", "b", filter).unwrap();

    let http: Candidate = CapabilityRef::new(id("publisher@1.0.0"))
        .with_attribute("kind", "http")
        .into();
    let grpc: Candidate = CapabilityRef::new(id("publisher@1.0.0"))
        .with_attribute("kind", "grpc")
        .into();

    assert!(visible(&digraph, &region("a"), &http));
    assert!(!visible(&digraph, &region("a"), &grpc));
    // The publishing module itself is not admitted by a capability-only
    // filter.
    assert!(!visible(&digraph, &region("a"), &id("publisher@1.0.0").into()));
    // Same-region capability visibility is unconditional.
    assert!(visible(&digraph, &region("b"), &grpc));
}

#[test]
fn batch_filter_preserves_candidate_order() {
    let digraph = RegionDigraph::new();
    digraph.create_region("a").unwrap();
    digraph.create_region("b").unwrap();
    for m in ["m1@1.0.0", "m2@1.0.0", "m3@1.0.0"] {
        digraph.add_module("b", id(m)).unwrap();
    }
    let filter = RegionFilter::builder()
        .allow(id("m3@1.0.0"))
        .allow(id("m1@1.0.0"))
        .build();
    digraph.connect("a", "b", filter).unwrap();

    let result = VisibilityResolver::filter(
        &digraph.snapshot(),
        &region("a"),
        vec![
            id("m1@1.0.0").into(),
            id("m2@1.0.0").into(),
            id("m3@1.0.0").into(),
        ],
    );
    assert_eq!(
        result,
        vec![
            Candidate::from(id("m1@1.0.0")),
            Candidate::from(id("m3@1.0.0")),
        ],
    );
}

#[test]
fn bundle_scenario_matches_expected_visibility() {
    // Regions A{bundleA}, B{bundleB}, C{bundleC}; edge A->B admits bundleB.
    let digraph = RegionDigraph::new();
    digraph.create_region("A").unwrap();
    digraph.create_region("B").unwrap();
    digraph.create_region("C").unwrap();
    digraph.add_module("A", id("bundleA@1.0.0")).unwrap();
    digraph.add_module("B", id("bundleB@1.0.0")).unwrap();
    digraph.add_module("C", id("bundleC@1.0.0")).unwrap();

    let filter = RegionFilter::builder().allow(id("bundleB@1.0.0")).build();
    digraph.connect("A", "B", filter).unwrap();

    let snapshot = digraph.snapshot();
    let origin = region("A");

    let from_a = VisibilityResolver::filter(
        &snapshot,
        &origin,
        vec![id("bundleB@1.0.0").into()],
    );
    assert_eq!(from_a, vec![Candidate::from(id("bundleB@1.0.0"))]);

    let unreachable = VisibilityResolver::filter(
        &snapshot,
        &origin,
        vec![id("bundleC@1.0.0").into()],
    );
    assert!(unreachable.is_empty());
}
