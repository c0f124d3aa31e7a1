use fvgen_domain::config::GenerationConfig;
use fvgen_domain::features::{Feature, Visibility};
use fvgen_graph::FeatureGraph;
use fvgen_singleton::{Configuration, ResolvedVariant, choice, expand, generate, merge};
use proptest::prelude::*;
use std::collections::BTreeSet;

#[derive(Debug, Clone)]
enum EdgeSpec {
    Singleton { family: usize, version: usize, tolerate: Vec<usize> },
    App(usize),
}

#[derive(Debug, Clone)]
struct Shape {
    /// Version count and privacy of each singleton family.
    families: Vec<(usize, bool)>,
    apps: Vec<Vec<EdgeSpec>>,
}

fn shape() -> impl Strategy<Value = Shape> {
    (proptest::collection::vec((1usize..=3, any::<bool>()), 1..=3), 1usize..=4)
        .prop_flat_map(|(families, apps)| {
            let family_count = families.len();
            let edge = prop_oneof![
                3 => (0..family_count, 0usize..3, proptest::collection::vec(0usize..3, 0..3))
                    .prop_map(|(family, version, tolerate)| EdgeSpec::Singleton {
                        family,
                        version,
                        tolerate,
                    }),
                1 => (0..apps).prop_map(EdgeSpec::App),
            ]
            .boxed();
            (Just(families), proptest::collection::vec(proptest::collection::vec(edge, 0..4), apps))
        })
        .prop_map(|(families, apps)| Shape { families, apps })
}

/// Every singleton version also gets a public feature requiring it directly, so each
/// tolerated binding has a preferred provider.
fn build(shape: &Shape) -> FeatureGraph {
    let mut features = Vec::new();
    for (family, &(versions, private)) in shape.families.iter().enumerate() {
        let visibility = if private { Visibility::Private } else { Visibility::Public };
        for version in 1..=versions {
            let name = format!("f{family}-{version}.0");
            features.push(Feature::new(&name).singleton().with_visibility(visibility));
            features.push(
                Feature::new(format!("use-f{family}-v{version}-1.0"))
                    .requires(name, Vec::<String>::new()),
            );
        }
    }
    for (index, edges) in shape.apps.iter().enumerate() {
        let mut app = Feature::new(format!("app{index}-1.0"));
        for edge in edges {
            app = match edge {
                EdgeSpec::Singleton { family, version, tolerate } => {
                    let versions = shape.families[*family].0;
                    let name = format!("f{family}-{}.0", version % versions + 1);
                    app.requires(name, tolerate.iter().map(|t| format!("{}.0", t + 1)))
                },
                EdgeSpec::App(other) => {
                    app.requires(format!("app{other}-1.0"), Vec::<String>::new())
                },
            };
        }
        features.push(app);
    }
    FeatureGraph::new(features).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn packing_is_sound_and_complete(shape in shape()) {
        let graph = build(&shape);
        let outcome = generate(&graph, &[] as &[&str], &GenerationConfig::default()).unwrap();

        prop_assert!(outcome.unsolved.is_empty());

        let mut placed = BTreeSet::new();
        for configuration in &outcome.configurations {
            prop_assert!(configuration.is_fully_preferred());
            for member in configuration.members() {
                prop_assert!(!graph.visibility(member.feature).is_private());
                for (group, choice) in &member.bindings {
                    prop_assert!(configuration.bindings()[group].selects_same(choice));
                }
                placed.insert(member.clone());
            }
        }

        for root in &outcome.roots {
            for variant in &outcome.permutations[root] {
                if !graph.visibility(variant.feature).is_private() {
                    prop_assert!(placed.contains(variant));
                }
            }
        }
    }

    #[test]
    fn configuration_absorbs_itself_and_its_subsets(shape in shape()) {
        let graph = build(&shape);
        let outcome = generate(&graph, &[] as &[&str], &GenerationConfig::default()).unwrap();

        for configuration in &outcome.configurations {
            let mut merged = configuration.clone();
            prop_assert!(merged.add_configuration(configuration));
            prop_assert_eq!(&merged, configuration);

            let mut subset = Configuration::new();
            for member in configuration.members().iter().step_by(2) {
                prop_assert!(subset.add(member.clone()));
            }
            prop_assert!(merged.add_configuration(&subset));
            prop_assert_eq!(&merged, configuration);
        }
    }

    #[test]
    fn expanded_variants_respect_public_preference(shape in shape()) {
        let graph = build(&shape);
        for (index, _) in shape.apps.iter().enumerate() {
            let root = graph.require(&format!("app{index}-1.0")).unwrap();
            let direct = fvgen_singleton::UnresolvedVariant::of(&graph, root).unwrap();
            for variant in expand(&graph, root).unwrap() {
                for (group, choice) in &variant.bindings {
                    let decided_at_root = direct.domain.contains_key(group);
                    prop_assert!(choice.preferred || group.is_private || decided_at_root);
                }
            }
        }
    }

    #[test]
    fn merge_is_idempotent(shape in shape()) {
        let graph = build(&shape);
        let root = graph.require("app0-1.0").unwrap();
        let variants = expand(&graph, root).unwrap();
        let ancestor = ResolvedVariant::new(root, choice::Bindings::new());

        let once = merge(&ancestor, &[variants.clone(), variants]);
        let twice = merge(&ancestor, std::slice::from_ref(&once));
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn union_with_itself_is_identity(shape in shape()) {
        let graph = build(&shape);
        for variant in expand(&graph, graph.require("app0-1.0").unwrap()).unwrap() {
            prop_assert_eq!(choice::union(&variant.bindings, &variant.bindings), variant.bindings);
        }
    }
}
