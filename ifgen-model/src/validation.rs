//! Advisory checks over a complete interface.
//!
//! None of these findings make a document invalid. They flag constructs
//! that some generators cannot emit as-is.

use crate::interface::Interface;
use crate::types::StructId;
use std::collections::HashMap;
use std::fmt;

/// Non-fatal finding about an interface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// Two elements of one enum resolve to the same value.
    DuplicateValue {
        /// Enum name.
        enum_name: String,
        /// Shared value.
        value: i64,
        /// Element declared first.
        first: String,
        /// Element declared later.
        second: String,
    },
    /// Two unscoped enums declare an element with the same name.
    ElementNameCollision {
        /// Shared element name.
        element: String,
        /// Enum declared first.
        first_enum: String,
        /// Enum declared later.
        second_enum: String,
    },
    /// A struct reaches itself through its members.
    StructCycle {
        /// Struct names along the cycle, starting and ending at the same struct.
        path: Vec<String>,
    },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateValue {
                enum_name,
                value,
                first,
                second,
            } => write!(
                f,
                "enum '{enum_name}': elements '{first}' and '{second}' share value {value}"
            ),
            Self::ElementNameCollision {
                element,
                first_enum,
                second_enum,
            } => write!(
                f,
                "element '{element}' is declared by enums '{first_enum}' and '{second_enum}' without internal_scope"
            ),
            Self::StructCycle { path } => {
                write!(f, "struct reference cycle: {}", path.join(" -> "))
            }
        }
    }
}

/// Runs every advisory check.
#[must_use]
pub fn lint(interface: &Interface) -> Vec<Warning> {
    let mut warnings = Vec::new();
    check_enum_values(interface, &mut warnings);
    check_element_collisions(interface, &mut warnings);
    check_struct_cycles(interface, &mut warnings);
    warnings
}

fn check_enum_values(interface: &Interface, warnings: &mut Vec<Warning>) {
    for enum_def in interface.enums() {
        let mut seen: HashMap<i64, &str> = HashMap::new();
        for element in enum_def.elements() {
            if let Some(first) = seen.insert(element.value(), element.name()) {
                warnings.push(Warning::DuplicateValue {
                    enum_name: enum_def.name().to_string(),
                    value: element.value(),
                    first: first.to_string(),
                    second: element.name().to_string(),
                });
            }
        }
    }
}

fn check_element_collisions(interface: &Interface, warnings: &mut Vec<Warning>) {
    let mut owners: HashMap<&str, &str> = HashMap::new();
    for enum_def in interface.enums() {
        if enum_def.internal_scope().is_some() {
            continue;
        }
        for element in enum_def.elements() {
            match owners.get(element.name()) {
                Some(&first_enum) => warnings.push(Warning::ElementNameCollision {
                    element: element.name().to_string(),
                    first_enum: first_enum.to_string(),
                    second_enum: enum_def.name().to_string(),
                }),
                None => {
                    owners.insert(element.name(), enum_def.name());
                }
            }
        }
    }
}

#[derive(Clone, Copy, PartialEq)]
enum Mark {
    Unvisited,
    InProgress,
    Done,
}

fn check_struct_cycles(interface: &Interface, warnings: &mut Vec<Warning>) {
    let mut marks = vec![Mark::Unvisited; interface.structs().len()];
    for struct_def in interface.structs() {
        visit(interface, struct_def.id(), &mut marks, warnings);
    }
}

/// Depth-first walk from `root` with an explicit stack of
/// (struct, next member index) frames.
fn visit(interface: &Interface, root: StructId, marks: &mut [Mark], warnings: &mut Vec<Warning>) {
    if marks[root.index()] != Mark::Unvisited {
        return;
    }
    marks[root.index()] = Mark::InProgress;
    let mut stack: Vec<(StructId, usize)> = vec![(root, 0)];

    while let Some(frame) = stack.last_mut() {
        let id = frame.0;
        let members = interface.struct_of(id).members();
        let Some(member) = members.get_index(frame.1) else {
            stack.pop();
            marks[id.index()] = Mark::Done;
            continue;
        };
        frame.1 += 1;

        let Some(target) = member.param_type.innermost().struct_id() else {
            continue;
        };
        match marks[target.index()] {
            Mark::Done => {}
            Mark::InProgress => {
                let start = stack.iter().position(|&(s, _)| s == target).unwrap_or(0);
                let mut path: Vec<String> = stack[start..]
                    .iter()
                    .map(|&(s, _)| interface.struct_of(s).name().to_string())
                    .collect();
                path.push(interface.struct_of(target).name().to_string());
                warnings.push(Warning::StructCycle { path });
            }
            Mark::Unvisited => {
                marks[target.index()] = Mark::InProgress;
                stack.push((target, 0));
            }
        }
    }
}
