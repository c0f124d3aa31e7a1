//! JSON shapes printed by the subcommands. Feature ids are replaced by names.

use fvgen::features::singleton::{Bindings, Choice};
use fvgen::{Configuration, FeatureGraph, GenerationOutcome, ResolvedVariant};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Serialize)]
pub(crate) struct BindingView<'a> {
    pub(crate) family: &'a str,
    pub(crate) private: bool,
    pub(crate) feature: &'a str,
    pub(crate) preferred: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct VariantView<'a> {
    pub(crate) feature: &'a str,
    pub(crate) bindings: Vec<BindingView<'a>>,
}

/// `public` members go straight into a server configuration; `protected` ones are what a
/// serializer would bundle into an aggregate feature.
#[derive(Debug, Serialize)]
pub(crate) struct ConfigurationView<'a> {
    pub(crate) public: Vec<&'a str>,
    pub(crate) protected: Vec<&'a str>,
    pub(crate) bindings: Vec<BindingView<'a>>,
}

#[derive(Debug, Serialize)]
pub(crate) struct GenerationView<'a> {
    pub(crate) roots: Vec<&'a str>,
    pub(crate) configurations: Vec<ConfigurationView<'a>>,
    pub(crate) unsolved: Vec<VariantView<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) permutations: Option<BTreeMap<&'a str, Vec<VariantView<'a>>>>,
}

pub(crate) fn binding<'a>(graph: &'a FeatureGraph, choice: &'a Choice) -> BindingView<'a> {
    BindingView {
        family: &choice.group.prefix,
        private: choice.group.is_private,
        feature: graph.name(choice.feature),
        preferred: choice.preferred,
    }
}

pub(crate) fn bindings<'a>(graph: &'a FeatureGraph, set: &'a Bindings) -> Vec<BindingView<'a>> {
    set.values().map(|choice| binding(graph, choice)).collect()
}

pub(crate) fn variant<'a>(graph: &'a FeatureGraph, rv: &'a ResolvedVariant) -> VariantView<'a> {
    VariantView { feature: graph.name(rv.feature), bindings: bindings(graph, &rv.bindings) }
}

pub(crate) fn configuration<'a>(
    graph: &'a FeatureGraph,
    config: &'a Configuration,
) -> ConfigurationView<'a> {
    let mut public = Vec::new();
    let mut protected = Vec::new();
    for member in config.members() {
        let name = graph.name(member.feature);
        let list =
            if graph.visibility(member.feature).is_public() { &mut public } else { &mut protected };
        if !list.contains(&name) {
            list.push(name);
        }
    }
    ConfigurationView { public, protected, bindings: bindings(graph, config.bindings()) }
}

pub(crate) fn generation<'a>(
    graph: &'a FeatureGraph,
    outcome: &'a GenerationOutcome,
    with_permutations: bool,
) -> GenerationView<'a> {
    let permutations = with_permutations.then(|| {
        outcome
            .permutations
            .iter()
            .map(|(id, set)| (graph.name(*id), set.iter().map(|v| variant(graph, v)).collect()))
            .collect()
    });

    GenerationView {
        roots: outcome.roots.iter().map(|id| graph.name(*id)).collect(),
        configurations: outcome.configurations.iter().map(|c| configuration(graph, c)).collect(),
        unsolved: outcome.unsolved.iter().map(|v| variant(graph, v)).collect(),
        permutations,
    }
}
