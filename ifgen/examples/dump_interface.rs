//! Prints a summary of an interface document.
//!
//! Run with: `cargo run --example dump_interface -- path/to/interface.xml`
//!
//! Set `RUST_LOG=debug` to see the parser's phase summaries.

use ifgen::prelude::*;

fn describe(interface: &Interface, param_type: &ParamType) -> String {
    match param_type {
        ParamType::Integer(int) => format!("Integer{}", bounds(int.min_value(), int.max_value())),
        ParamType::Double(double) => {
            format!("Double{}", bounds(double.min_value(), double.max_value()))
        }
        ParamType::Boolean => "Boolean".to_string(),
        ParamType::String(string) => {
            format!("String{}", bounds(string.min_length(), string.max_length()))
        }
        ParamType::Array(array) => format!(
            "Array<{}>{}",
            describe(interface, array.element_type()),
            bounds(array.min_size(), array.max_size())
        ),
        ParamType::Struct(id) => interface.struct_of(*id).name().to_string(),
        ParamType::Enum(id) => interface.enum_of(*id).name().to_string(),
        ParamType::EnumSubset(subset) => {
            let names: Vec<&str> = subset
                .allowed_elements()
                .iter()
                .map(|(name, _)| name.as_str())
                .collect();
            format!(
                "{}{{{}}}",
                interface.enum_of(subset.enum_id()).name(),
                names.join(", ")
            )
        }
    }
}

fn bounds<T: std::fmt::Display>(min: Option<T>, max: Option<T>) -> String {
    match (min, max) {
        (None, None) => String::new(),
        (min, max) => format!(
            "[{}..{}]",
            min.map(|v| v.to_string()).unwrap_or_default(),
            max.map(|v| v.to_string()).unwrap_or_default()
        ),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let path = std::env::args()
        .nth(1)
        .ok_or("usage: dump_interface <interface.xml>")?;
    let interface = ifgen::parse_file(&path)?;

    for (name, value) in interface.params() {
        println!("param {name} = {value}");
    }

    for enum_def in interface.enums() {
        println!("enum {}", enum_def.name());
        for element in enum_def.elements() {
            let origin = if element.explicit_value().is_some() {
                ""
            } else {
                " (implicit)"
            };
            println!("  {} = {}{origin}", element.name(), element.value());
        }
    }

    for struct_def in interface.structs() {
        println!("struct {}", struct_def.name());
        for member in struct_def.members() {
            let optional = if member.is_mandatory { "" } else { "?" };
            println!(
                "  {}{optional}: {}",
                member.meta.name,
                describe(&interface, &member.param_type)
            );
        }
    }

    for function in interface.functions() {
        println!(
            "function {} ({}, {})",
            function.name(),
            interface.element(function.function_id()).name(),
            interface.element(function.message_type()).name()
        );
        for param in function.params() {
            let optional = if param.is_mandatory { "" } else { "?" };
            println!(
                "  {}{optional}: {}",
                param.meta.name,
                describe(&interface, &param.param_type)
            );
        }
    }

    for warning in lint(&interface) {
        println!("warning: {warning}");
    }

    Ok(())
}
