//! Validated step graph built from a [`ProcessTemplate`].

use super::error::{TemplateError, TemplateResult};
use ob_protocol::document_models::DocumentSpec;
use ob_protocol::template_models::{ProcessTemplate, StepDefinition, StepNumber};
use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;
use std::collections::{BTreeMap, BTreeSet};

/// An immutable, validated process template.
///
/// Construction guarantees that:
/// - there is at least one step
/// - step numbers are unique and dense from 0, so `steps[n].step_number == n`
/// - every dependency refers to an existing step
/// - the dependency edges are acyclic
/// - every referenced document exists in the catalog
///
/// A `StepGraph` is never mutated after construction and can be shared
/// between tasks behind an `Arc` without locking.
#[derive(Debug, Clone)]
pub struct StepGraph {
    name: String,
    description: String,
    steps: Vec<StepDefinition>,
    process_documents: BTreeSet<String>,
    documents: BTreeMap<String, DocumentSpec>,
    topological_order: Vec<StepNumber>,
}

impl StepGraph {
    /// Validate a template against a document catalog and build its graph.
    ///
    /// # Errors
    ///
    /// Returns the first [`TemplateError`] found, checked in this order:
    /// empty template, duplicate step, non-dense numbering, dangling
    /// dependency, cycle, unknown document.
    pub fn build(template: &ProcessTemplate, catalog: &[DocumentSpec]) -> TemplateResult<Self> {
        let process = template.name.clone();

        if template.steps.is_empty() {
            return Err(TemplateError::Empty { process });
        }

        let mut steps = template.steps.clone();
        steps.sort_by_key(|step| step.step_number);

        for pair in steps.windows(2) {
            if pair[0].step_number == pair[1].step_number {
                return Err(TemplateError::DuplicateStep {
                    process,
                    step: pair[0].step_number,
                });
            }
        }

        let is_dense = steps
            .iter()
            .enumerate()
            .all(|(index, step)| step.step_number as usize == index);
        if !is_dense {
            return Err(TemplateError::NonDenseSteps {
                process,
                found: steps.iter().map(|step| step.step_number).collect(),
            });
        }

        let mut graph: DiGraphMap<StepNumber, ()> = DiGraphMap::new();
        for step in &steps {
            graph.add_node(step.step_number);
        }
        for step in &steps {
            for &dependency in &step.depends_on {
                if dependency as usize >= steps.len() {
                    return Err(TemplateError::DanglingDependency {
                        process,
                        step: step.step_number,
                        dependency,
                    });
                }
                graph.add_edge(dependency, step.step_number, ());
            }
        }

        let topological_order = toposort(&graph, None).map_err(|cycle| TemplateError::Cycle {
            process: process.clone(),
            step: cycle.node_id(),
        })?;

        let catalog: BTreeMap<&str, &DocumentSpec> = catalog
            .iter()
            .map(|document| (document.document_id.as_str(), document))
            .collect();

        let mut documents = BTreeMap::new();
        let referenced = template
            .required_documents
            .iter()
            .chain(steps.iter().flat_map(|step| step.required_documents.iter()));
        for document_id in referenced {
            let spec = catalog
                .get(document_id.as_str())
                .ok_or_else(|| TemplateError::UnknownDocument {
                    process: process.clone(),
                    document_id: document_id.clone(),
                })?;
            documents.insert(document_id.clone(), (*spec).clone());
        }

        Ok(Self {
            name: template.name.clone(),
            description: template.description.clone(),
            steps,
            process_documents: template.required_documents.clone(),
            documents,
            topological_order,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// All steps, ordered by step number.
    pub fn all_steps(&self) -> &[StepDefinition] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Look up a step by its number.
    pub fn step(&self, step_number: StepNumber) -> Option<&StepDefinition> {
        self.steps.get(step_number as usize)
    }

    pub fn contains(&self, step_number: StepNumber) -> bool {
        self.step(step_number).is_some()
    }

    /// The step with the lowest number.
    pub fn first_step(&self) -> Option<&StepDefinition> {
        self.steps.first()
    }

    /// The step with the highest number.
    pub fn last_step(&self) -> Option<&StepDefinition> {
        self.steps.last()
    }

    /// The step that follows `step_number` in numbering order.
    pub fn next_step(&self, step_number: StepNumber) -> Option<&StepDefinition> {
        self.step(step_number.checked_add(1)?)
    }

    /// Direct prerequisites of a step, or `None` if the step does not exist.
    pub fn dependencies_of(&self, step_number: StepNumber) -> Option<&BTreeSet<StepNumber>> {
        self.step(step_number).map(|step| &step.depends_on)
    }

    /// Documents required by a specific step, or `None` if the step does
    /// not exist.
    pub fn documents_required_for(&self, step_number: StepNumber) -> Option<Vec<&DocumentSpec>> {
        let step = self.step(step_number)?;
        Some(
            step.required_documents
                .iter()
                .filter_map(|document_id| self.documents.get(document_id))
                .collect(),
        )
    }

    /// Documents required by the process as a whole.
    pub fn process_documents(&self) -> Vec<&DocumentSpec> {
        self.process_documents
            .iter()
            .filter_map(|document_id| self.documents.get(document_id))
            .collect()
    }

    /// Every document the template requires, process-level and step-level.
    pub fn required_documents(&self) -> impl Iterator<Item = &DocumentSpec> {
        self.documents.values()
    }

    pub fn is_required_document(&self, document_id: &str) -> bool {
        self.documents.contains_key(document_id)
    }

    pub fn step_numbers(&self) -> BTreeSet<StepNumber> {
        self.steps.iter().map(|step| step.step_number).collect()
    }

    /// Steps that declare at least one prerequisite.
    pub fn steps_with_dependencies(&self) -> BTreeSet<StepNumber> {
        self.steps
            .iter()
            .filter(|step| !step.depends_on.is_empty())
            .map(|step| step.step_number)
            .collect()
    }

    /// True when `completed` contains every step of the template.
    pub fn is_covered_by(&self, completed: &BTreeSet<StepNumber>) -> bool {
        self.steps
            .iter()
            .all(|step| completed.contains(&step.step_number))
    }

    /// An order in which every step comes after all of its prerequisites.
    pub fn topological_order(&self) -> &[StepNumber] {
        &self.topological_order
    }
}
