//! Lowering of decoded records into target artifacts.
//!
//! Mangling order is observable through collision suffixes, so it is kept
//! fixed: a host's or group's vars are mangled before its name, and module
//! parameters before the module name.
use serde_yaml::{Mapping, Value};

use super::model::{Document, Group, Host, Invocation, Play, Playbook, Role, Var};
use crate::error::{CompileError, ValueError};
use crate::mangle::Mangler;
use crate::output::Artifact;
use crate::output::ini::{IniFile, IniSection};
use crate::reader::Form;

/// File name of the engine-defaults file.
pub const ENGINE_DEFAULTS_FILE: &str = "ansible.cfg";

/// Base name of the inventory file.
pub const INVENTORY_BASENAME: &str = "hosts";

/// Convert a source value to YAML. Symbols render as their names.
#[must_use]
pub fn scalar_to_yaml(form: &Form) -> Value {
    match form {
        Form::Symbol(s) | Form::String(s) => Value::String(s.clone()),
        Form::Integer(i) => Value::Number((*i).into()),
        Form::Boolean(b) => Value::Bool(*b),
        Form::List(items) => Value::Sequence(items.iter().map(scalar_to_yaml).collect()),
    }
}

fn key(name: &str) -> Value {
    Value::String(name.to_string())
}

pub(super) struct Lowerer<'a> {
    mangler: &'a mut Mangler,
    extension: &'a str,
}

impl<'a> Lowerer<'a> {
    pub(super) const fn new(mangler: &'a mut Mangler, extension: &'a str) -> Self {
        Self { mangler, extension }
    }

    fn yaml_path(&self, stem: &str) -> String {
        format!("{stem}.{}", self.extension)
    }

    /// Lower a document in the fixed pass order: options, groups, roles,
    /// playbooks.
    pub(super) fn document(&mut self, doc: &Document) -> Result<Vec<Artifact>, CompileError> {
        let mut artifacts = vec![
            self.engine_defaults(&doc.options)?,
            self.inventory(&doc.groups),
        ];
        for role in &doc.roles {
            artifacts.extend(self.role(role));
        }
        for playbook in &doc.playbooks {
            artifacts.push(self.playbook(playbook));
        }
        Ok(artifacts)
    }

    fn engine_defaults(&mut self, options: &[Var]) -> Result<Artifact, CompileError> {
        let mut defaults = IniSection::new("defaults");
        defaults.set("inventory", self.yaml_path(INVENTORY_BASENAME));
        for var in options {
            let Some(value) = var.value.as_bool() else {
                return Err(ValueError::NotBoolean {
                    key: var.name.clone(),
                    found: var.value.to_string(),
                }
                .into());
            };
            let name = self.mangler.mangle(&var.name);
            defaults.set(&name, value.to_string());
        }
        Ok(Artifact::ini(
            ENGINE_DEFAULTS_FILE,
            IniFile {
                sections: vec![defaults],
            },
        ))
    }

    fn vars(&mut self, vars: &[Var]) -> Mapping {
        let mut table = Mapping::new();
        for var in vars {
            table.insert(
                Value::String(self.mangler.mangle(&var.name)),
                scalar_to_yaml(&var.value),
            );
        }
        table
    }

    fn hosts(&mut self, hosts: &[Host]) -> Mapping {
        let mut table = Mapping::new();
        for host in hosts {
            let vars = self.vars(&host.vars);
            table.insert(
                Value::String(self.mangler.mangle(&host.name)),
                Value::Mapping(vars),
            );
        }
        table
    }

    fn inventory(&mut self, groups: &[Group]) -> Artifact {
        let mut table = Mapping::new();
        for group in groups {
            let hosts = self.hosts(&group.hosts);
            let vars = self.vars(&group.vars);
            let mut entry = Mapping::new();
            entry.insert(key("hosts"), Value::Mapping(hosts));
            entry.insert(key("vars"), Value::Mapping(vars));
            table.insert(
                Value::String(self.mangler.mangle(&group.name)),
                Value::Mapping(entry),
            );
        }
        Artifact::yaml(self.yaml_path(INVENTORY_BASENAME), Value::Mapping(table))
    }

    fn invocation(&mut self, invocation: &Invocation) -> Value {
        let mut table = Mapping::new();
        table.insert(
            key("name"),
            invocation
                .title
                .as_deref()
                .map_or(Value::Null, |title| Value::String(title.to_string())),
        );
        let mut params = Mapping::new();
        for (param, value) in &invocation.params {
            params.insert(
                Value::String(self.mangler.mangle(param)),
                scalar_to_yaml(value),
            );
        }
        table.insert(
            Value::String(self.mangler.mangle(&invocation.module)),
            Value::Mapping(params),
        );
        for (extra, value) in &invocation.extras {
            table.insert(
                Value::String(self.mangler.mangle(extra)),
                scalar_to_yaml(value),
            );
        }
        Value::Mapping(table)
    }

    fn role_subdirectory(&mut self, dir: &str, invocations: &[Invocation]) -> Artifact {
        let lowered = invocations
            .iter()
            .map(|invocation| self.invocation(invocation))
            .collect();
        Artifact::yaml(
            self.yaml_path(&format!("{dir}/main")),
            Value::Sequence(lowered),
        )
    }

    fn role(&mut self, role: &Role) -> Vec<Artifact> {
        let name = self.mangler.mangle(&role.name);
        let tasks = self.role_subdirectory(&format!("roles/{name}/tasks"), &role.tasks);
        let mut artifacts = vec![tasks];
        if let Some(handlers) = &role.handlers {
            artifacts.push(self.role_subdirectory(&format!("roles/{name}/handlers"), handlers));
        }
        artifacts
    }

    fn references(&mut self, names: &[String]) -> Value {
        Value::Sequence(
            names
                .iter()
                .map(|name| Value::String(self.mangler.mangle(name)))
                .collect(),
        )
    }

    fn play(&mut self, play: &Play) -> Value {
        let mut table = Mapping::new();
        table.insert(key("name"), Value::String(self.mangler.mangle(&play.name)));
        table.insert(key("hosts"), self.references(&play.hosts));
        table.insert(key("become"), play.become_root.map_or(Value::Null, Value::Bool));
        table.insert(key("roles"), self.references(&play.roles));
        Value::Mapping(table)
    }

    fn playbook(&mut self, playbook: &Playbook) -> Artifact {
        let plays = playbook.plays.iter().map(|play| self.play(play)).collect();
        Artifact::yaml(self.yaml_path(&playbook.name), Value::Sequence(plays))
    }
}
