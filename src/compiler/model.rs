//! Typed records decoded from the generic form tree.
//!
//! Decoding validates shape only: mandatory properties, arity and scalar
//! kinds. It never mangles, so every name is still the source spelling.
use crate::error::StructureError;
use crate::object::{
    Scalar, complex_property, find_first_or_fail, is_tagged, required_simple_property,
    simple_property, strip_tag,
};
use crate::reader::Form;
use crate::sink::validate_relative_path;

/// A top-level section, recognised by its tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section<'a> {
    /// `(file-header ...)`, ignored.
    FileHeader,
    /// Body of `(options VAR...)`.
    Options(&'a [Form]),
    /// Body of `(groups GROUP...)`.
    Groups(&'a [Form]),
    /// Body of `(roles ROLE...)`.
    Roles(&'a [Form]),
    /// Body of `(playbooks PLAYBOOK...)`.
    Playbooks(&'a [Form]),
}

impl<'a> Section<'a> {
    /// Decode one top-level form.
    ///
    /// # Errors
    ///
    /// Returns [`StructureError::UnknownTopLevel`] for any other form.
    pub fn decode(form: &'a Form) -> Result<Self, StructureError> {
        let unknown = || StructureError::UnknownTopLevel(form.to_string());
        match form.as_list() {
            Some([head, body @ ..]) => match head.as_symbol() {
                Some("file-header") => Ok(Self::FileHeader),
                Some("options") => Ok(Self::Options(body)),
                Some("groups") => Ok(Self::Groups(body)),
                Some("roles") => Ok(Self::Roles(body)),
                Some("playbooks") => Ok(Self::Playbooks(body)),
                _ => Err(unknown()),
            },
            _ => Err(unknown()),
        }
    }
}

/// A whole source file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    /// Engine defaults.
    pub options: Vec<Var>,
    /// Inventory groups.
    pub groups: Vec<Group>,
    /// Roles, each lowered to its own directory.
    pub roles: Vec<Role>,
    /// Playbooks, each lowered to its own file.
    pub playbooks: Vec<Playbook>,
}

/// `(var NAME VALUE)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Var {
    /// Variable name as written.
    pub name: String,
    /// Unconverted value.
    pub value: Form,
}

/// `(group (name N) (hosts HOST...) (vars VAR...))`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    /// Group name as written.
    pub name: String,
    /// Member hosts.
    pub hosts: Vec<Host>,
    /// Group variables.
    pub vars: Vec<Var>,
}

/// `(host (name N) (vars VAR...))`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Host {
    /// Host name as written.
    pub name: String,
    /// Host variables.
    pub vars: Vec<Var>,
}

/// `(role (name N) (tasks TASK...) (handlers HANDLER...))`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Role {
    /// Role name as written.
    pub name: String,
    /// At least one task.
    pub tasks: Vec<Invocation>,
    /// `None` when the role declares no handlers (or an empty list).
    pub handlers: Option<Vec<Invocation>>,
}

/// A task or handler: optional title, one module call, extra keywords.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Human-readable `(title "...")`.
    pub title: Option<String>,
    /// Module name as written.
    pub module: String,
    /// Module parameters in source order.
    pub params: Vec<(String, Form)>,
    /// Sibling keys such as `when` or `notify`.
    pub extras: Vec<(String, Form)>,
}

/// `(playbook (name "file") (plays PLAY...))`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Playbook {
    /// Output file stem, relative to the output root.
    pub name: String,
    /// Plays in source order.
    pub plays: Vec<Play>,
}

/// `(play (name N) (hosts REF...) (become BOOL) (roles REF...))`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Play {
    /// Play name as written.
    pub name: String,
    /// Group or host references.
    pub hosts: Vec<String>,
    /// Privilege escalation, `None` when unspecified.
    pub become_root: Option<bool>,
    /// Role references.
    pub roles: Vec<String>,
}

impl Document {
    /// Decode the forms of one source file.
    ///
    /// A form tagged `ansible` is a wrapper: its body is decoded as if it
    /// appeared at the top level. Each section may appear at most once;
    /// absent sections decode as empty.
    ///
    /// # Errors
    ///
    /// Returns a [`StructureError`] for unknown or duplicate sections and for
    /// any malformed object inside them.
    pub fn decode(forms: &[Form]) -> Result<Self, StructureError> {
        let mut options = None;
        let mut groups = None;
        let mut roles = None;
        let mut playbooks = None;

        for section in unwrap_top_level(forms) {
            let (slot, tag, body) = match Section::decode(section)? {
                Section::FileHeader => continue,
                Section::Options(body) => (&mut options, "options", body),
                Section::Groups(body) => (&mut groups, "groups", body),
                Section::Roles(body) => (&mut roles, "roles", body),
                Section::Playbooks(body) => (&mut playbooks, "playbooks", body),
            };
            if slot.replace(body).is_some() {
                return Err(StructureError::DuplicateSection(tag.to_string()));
            }
        }

        Ok(Self {
            options: decode_all(options, Var::decode_option)?,
            groups: decode_all(groups, Group::decode)?,
            roles: decode_all(roles, Role::decode)?,
            playbooks: decode_all(playbooks, Playbook::decode)?,
        })
    }
}

fn unwrap_top_level(forms: &[Form]) -> impl Iterator<Item = &Form> {
    forms.iter().flat_map(|form| match strip_tag("ansible", form) {
        Ok(body) => body.iter(),
        Err(_) => std::slice::from_ref(form).iter(),
    })
}

fn decode_all<T>(
    forms: Option<&[Form]>,
    decode: impl Fn(&Form) -> Result<T, StructureError>,
) -> Result<Vec<T>, StructureError> {
    forms.unwrap_or_default().iter().map(decode).collect()
}

/// Extract the symbol name of a form, or fail naming `what` was expected.
fn symbol_name(what: &'static str, form: &Form) -> Result<String, StructureError> {
    form.as_symbol()
        .map(str::to_string)
        .ok_or_else(|| StructureError::Malformed {
            what,
            found: form.to_string(),
        })
}

fn required_name(object: &str, body: &[Form]) -> Result<String, StructureError> {
    let name = required_simple_property(object, body, "name", Scalar::Symbol)?;
    symbol_name("name", name)
}

/// Split a `(KEY VALUE)` pair.
fn key_value(what: &'static str, form: &Form) -> Result<(String, Form), StructureError> {
    match form.as_list() {
        Some([Form::Symbol(key), value]) => Ok((key.clone(), value.clone())),
        _ => Err(StructureError::Malformed {
            what,
            found: form.to_string(),
        }),
    }
}

impl Var {
    /// Decode `(var NAME VALUE)`.
    ///
    /// # Errors
    ///
    /// Returns a [`StructureError`] if the form is not a two-element `var`.
    pub fn decode(form: &Form) -> Result<Self, StructureError> {
        match strip_tag("var", form)? {
            [name, value] => Ok(Self {
                name: symbol_name("variable name", name)?,
                value: value.clone(),
            }),
            _ => Err(StructureError::Malformed {
                what: "variable",
                found: form.to_string(),
            }),
        }
    }

    /// Like [`Var::decode`], also accepting `(var (NAME) VALUE)` as used in
    /// engine options.
    ///
    /// # Errors
    ///
    /// Returns a [`StructureError`] for any other shape.
    pub fn decode_option(form: &Form) -> Result<Self, StructureError> {
        if let [Form::List(wrapped), value] = strip_tag("var", form)?
            && let [Form::Symbol(name)] = wrapped.as_slice()
        {
            return Ok(Self {
                name: name.clone(),
                value: value.clone(),
            });
        }
        Self::decode(form)
    }
}

fn decode_vars(body: &[Form]) -> Result<Vec<Var>, StructureError> {
    complex_property(body, "vars")
        .unwrap_or_default()
        .iter()
        .map(Var::decode)
        .collect()
}

impl Group {
    /// Decode a `group` object.
    ///
    /// # Errors
    ///
    /// Returns a [`StructureError`] if `name` is missing or any host/var is
    /// malformed.
    pub fn decode(form: &Form) -> Result<Self, StructureError> {
        let body = strip_tag("group", form)?;
        Ok(Self {
            name: required_name("group", body)?,
            hosts: complex_property(body, "hosts")
                .unwrap_or_default()
                .iter()
                .map(Host::decode)
                .collect::<Result<_, _>>()?,
            vars: decode_vars(body)?,
        })
    }
}

impl Host {
    /// Decode a `host` object.
    ///
    /// # Errors
    ///
    /// Returns a [`StructureError`] if `name` is missing or a var is malformed.
    pub fn decode(form: &Form) -> Result<Self, StructureError> {
        let body = strip_tag("host", form)?;
        Ok(Self {
            name: required_name("host", body)?,
            vars: decode_vars(body)?,
        })
    }
}

impl Role {
    /// Decode a `role` object.
    ///
    /// # Errors
    ///
    /// Returns [`StructureError::RoleWithoutTasks`] if `tasks` is absent or
    /// empty, and other [`StructureError`]s for malformed content.
    pub fn decode(form: &Form) -> Result<Self, StructureError> {
        let body = strip_tag("role", form)?;
        let name = required_name("role", body)?;
        let tasks = match complex_property(body, "tasks") {
            Some(tasks) if !tasks.is_empty() => Invocation::decode_all(tasks, "task")?,
            _ => return Err(StructureError::RoleWithoutTasks(name)),
        };
        let handlers = match complex_property(body, "handlers") {
            Some(handlers) if !handlers.is_empty() => {
                Some(Invocation::decode_all(handlers, "handler")?)
            }
            _ => None,
        };
        Ok(Self {
            name,
            tasks,
            handlers,
        })
    }
}

impl Invocation {
    /// Decode every element of `forms` as a `(tag ...)` invocation.
    ///
    /// # Errors
    ///
    /// Returns a [`StructureError`] for the first malformed element.
    pub fn decode_all(forms: &[Form], tag: &str) -> Result<Vec<Self>, StructureError> {
        forms.iter().map(|form| Self::decode(form, tag)).collect()
    }

    /// Decode `(tag [(title "...")] (MODULE (PARAM VALUE)...) (KEY VALUE)...)`.
    ///
    /// # Errors
    ///
    /// Returns a [`StructureError`] if the module call is missing or any
    /// pair does not have exactly one value.
    pub fn decode(form: &Form, tag: &str) -> Result<Self, StructureError> {
        let body = strip_tag(tag, form)?;
        let (title, rest) = match body {
            [first, rest @ ..] if is_tagged("title", first) => {
                let title = simple_property(std::slice::from_ref(first), "title", Scalar::String)?;
                (title.and_then(Form::as_str).map(str::to_string), rest)
            }
            _ => (None, body),
        };
        let Some((call, extras)) = rest.split_first() else {
            return Err(StructureError::MissingProperty {
                object: tag.to_string(),
                property: "module".to_string(),
            });
        };
        let Some([module, params @ ..]) = call.as_list() else {
            return Err(StructureError::Malformed {
                what: "module invocation",
                found: call.to_string(),
            });
        };
        Ok(Self {
            title,
            module: symbol_name("module name", module)?,
            params: params
                .iter()
                .map(|p| key_value("module parameter", p))
                .collect::<Result<_, _>>()?,
            extras: extras
                .iter()
                .map(|p| key_value("keyword", p))
                .collect::<Result<_, _>>()?,
        })
    }
}

impl Playbook {
    /// Decode a `playbook` object.
    ///
    /// # Errors
    ///
    /// Returns a [`StructureError`] if the string `name` is missing or a play
    /// is malformed, and [`StructureError::Malformed`] if `name` is empty,
    /// absolute or climbs out of the output root.
    pub fn decode(form: &Form) -> Result<Self, StructureError> {
        let body = strip_tag("playbook", form)?;
        let name = required_simple_property("playbook", body, "name", Scalar::String)?;
        let file = name.as_str().unwrap_or_default();
        if validate_relative_path(file).is_err() {
            return Err(StructureError::Malformed {
                what: "playbook name",
                found: name.to_string(),
            });
        }
        Ok(Self {
            name: file.to_string(),
            plays: complex_property(body, "plays")
                .unwrap_or_default()
                .iter()
                .map(Play::decode)
                .collect::<Result<_, _>>()?,
        })
    }
}

impl Play {
    /// Decode a `play` object.
    ///
    /// # Errors
    ///
    /// Returns a [`StructureError`] if `name` or `hosts` is missing, or a
    /// reference is not a symbol.
    pub fn decode(form: &Form) -> Result<Self, StructureError> {
        let body = strip_tag("play", form)?;
        let name = required_name("play", body)?;
        let hosts = strip_tag("hosts", find_first_or_fail("play", "hosts", body)?)?;
        let references = |what, forms: &[Form]| -> Result<Vec<String>, StructureError> {
            forms.iter().map(|f| symbol_name(what, f)).collect()
        };
        Ok(Self {
            name,
            hosts: references("host reference", hosts)?,
            become_root: simple_property(body, "become", Scalar::Boolean)?.and_then(Form::as_bool),
            roles: references("role reference", complex_property(body, "roles").unwrap_or_default())?,
        })
    }
}
