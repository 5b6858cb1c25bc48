//! End-to-end checks against a complete interface document.

use crate::parser::parse_interface;
use ifgen_model::{
    DefaultValue, ElementRef, FunctionKey, Interface, Issue, Metadata, ParamType, lint,
};

const VALID_XML: &str = include_str!("../testdata/valid_alrpcv2.xml");

fn parse() -> Interface {
    parse_interface(VALID_XML).expect("fixture parses")
}

fn lines(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Builds the expected metadata: description, design description, todos, issues.
fn meta(
    name: &str,
    description: &[&str],
    design_description: &[&str],
    todos: &[&str],
    issues: &[(&str, &str)],
) -> Metadata {
    Metadata {
        name: name.to_string(),
        description: lines(description),
        design_description: lines(design_description),
        todos: lines(todos),
        issues: issues.iter().map(|&(c, v)| Issue::new(c, v)).collect(),
    }
}

fn bare(name: &str) -> Metadata {
    Metadata::new(name)
}

fn element(interface: &Interface, enum_name: &str, element: &str) -> ElementRef {
    interface
        .enum_by_name(enum_name)
        .and_then(|e| e.element_ref(element))
        .expect("element exists")
}

#[test]
fn test_params() {
    let interface = parse();
    assert_eq!(interface.params().len(), 2);
    assert_eq!(interface.param("attribute1"), Some("value1"));
    assert_eq!(interface.param("attribute2"), Some("value2"));
}

#[test]
fn test_enums() {
    let interface = parse();
    assert_eq!(
        interface.enums().names().collect::<Vec<_>>(),
        vec!["FunctionID", "messageType", "enum1"]
    );

    let function_id = interface.enum_by_name("FunctionID").unwrap();
    assert_eq!(
        function_id.metadata(),
        &meta(
            "FunctionID",
            &["Description string 1", "Description string 2"],
            &[],
            &["Function id todo"],
            &[]
        )
    );
    assert_eq!(function_id.internal_scope(), None);
    assert_eq!(function_id.elements().len(), 2);

    let f1 = function_id.element("Function1_id").unwrap();
    assert_eq!(
        f1.metadata(),
        &meta("Function1_id", &[], &["Function1 element design description"], &[], &[])
    );
    assert_eq!(f1.internal_name(), None);
    assert_eq!(f1.explicit_value(), Some(10));
    assert_eq!(f1.value(), 10);

    let f2 = function_id.element("Function2_id").unwrap();
    assert_eq!(f2.metadata(), &bare("Function2_id"));
    assert_eq!(f2.internal_name(), Some("Function2_internal"));
    assert_eq!(f2.explicit_value(), None);
    assert_eq!(f2.value(), 11);

    let message_type = interface.enum_by_name("messageType").unwrap();
    assert_eq!(
        message_type.metadata(),
        &meta(
            "messageType",
            &[],
            &["messageType design description", "messageType design description 2"],
            &[],
            &[("messageType issue creator", "Issue text")]
        )
    );
    assert_eq!(message_type.internal_scope(), None);
    assert_eq!(
        message_type.elements().names().collect::<Vec<_>>(),
        vec!["request", "response", "notification"]
    );
    let request = message_type.element("request").unwrap();
    assert_eq!(
        request.metadata(),
        &meta(
            "request",
            &[],
            &[],
            &["request todo 1", "request todo 2"],
            &[("issue creator", "request issue")]
        )
    );
    assert_eq!(request.internal_name(), None);
    for (name, value) in [("request", 0), ("response", 1), ("notification", 2)] {
        let element = message_type.element(name).unwrap();
        assert_eq!(element.explicit_value(), Some(value));
        assert_eq!(element.value(), value);
    }
    assert_eq!(message_type.element("response").unwrap().metadata(), &bare("response"));

    let enum1 = interface.enum_by_name("enum1").unwrap();
    assert_eq!(enum1.metadata(), &bare("enum1"));
    assert_eq!(enum1.internal_scope(), Some("scope"));
    assert_eq!(enum1.elements().len(), 3);

    let element1 = enum1.element("element1").unwrap();
    assert_eq!(element1.internal_name(), None);
    assert_eq!(element1.explicit_value(), Some(10));

    let element2 = enum1.element("element2").unwrap();
    assert_eq!(element2.internal_name(), Some("element2_internal"));
    assert_eq!(element2.explicit_value(), Some(11));

    let element3 = enum1.element("element3").unwrap();
    assert_eq!(
        element3.metadata(),
        &meta("element3", &[], &["Element design description"], &[], &[])
    );
    assert_eq!(element3.internal_name(), None);
    assert_eq!(element3.explicit_value(), None);
    assert_eq!(element3.value(), 12);
}

#[test]
fn test_structs() {
    let interface = parse();
    assert_eq!(
        interface.structs().names().collect::<Vec<_>>(),
        vec!["struct1", "struct2"]
    );

    let struct1 = interface.struct_by_name("struct1").unwrap();
    assert_eq!(
        struct1.metadata(),
        &meta(
            "struct1",
            &["Struct description"],
            &[],
            &[],
            &[("creator1", "Issue1"), ("creator2", "Issue2")]
        )
    );
    assert_eq!(struct1.members().len(), 4);

    let member1 = struct1.member("member1").unwrap();
    assert_eq!(member1.meta, meta("member1", &["Param1 description"], &[], &[], &[]));
    assert!(member1.is_mandatory);
    let ParamType::Integer(int) = &member1.param_type else {
        panic!("member1 should be Integer");
    };
    assert_eq!((int.min_value(), int.max_value()), (None, None));

    let member2 = struct1.member("member2").unwrap();
    assert_eq!(member2.meta, bare("member2"));
    assert!(member2.is_mandatory);
    assert_eq!(member2.param_type, ParamType::Boolean);

    let member3 = struct1.member("member3").unwrap();
    assert!(!member3.is_mandatory);
    let ParamType::Double(double) = &member3.param_type else {
        panic!("member3 should be Double");
    };
    assert_eq!(double.min_value(), None);
    assert!((double.max_value().unwrap() - 20.5).abs() < f64::EPSILON);

    let member4 = struct1.member("member4").unwrap();
    assert!(member4.is_mandatory);
    let ParamType::Array(array) = &member4.param_type else {
        panic!("member4 should be Array");
    };
    assert_eq!((array.min_size(), array.max_size()), (None, None));
    let ParamType::Integer(int) = array.element_type() else {
        panic!("member4 elements should be Integer");
    };
    assert_eq!((int.min_value(), int.max_value()), (Some(11), Some(100)));

    let struct2 = interface.struct_by_name("struct2").unwrap();
    assert_eq!(
        struct2.metadata(),
        &meta("struct2", &["Description of struct2"], &[], &[], &[])
    );
    assert_eq!(
        struct2.members().names().collect::<Vec<_>>(),
        vec!["m1", "m2", "m3", "m4"]
    );
    assert!(struct2.members().iter().all(|m| m.is_mandatory));

    let ParamType::String(string) = &struct2.member("m1").unwrap().param_type else {
        panic!("m1 should be String");
    };
    assert_eq!(string.max_length(), None);

    let ParamType::Array(array) = &struct2.member("m2").unwrap().param_type else {
        panic!("m2 should be Array");
    };
    assert_eq!((array.min_size(), array.max_size()), (Some(1), Some(50)));
    let ParamType::String(string) = array.element_type() else {
        panic!("m2 elements should be String");
    };
    assert_eq!(string.max_length(), Some(100));

    let enum1 = interface.enum_by_name("enum1").unwrap();
    assert_eq!(
        struct2.member("m3").unwrap().param_type,
        ParamType::Enum(enum1.id())
    );

    let ParamType::Array(array) = &struct2.member("m4").unwrap().param_type else {
        panic!("m4 should be Array");
    };
    assert_eq!((array.min_size(), array.max_size()), (None, Some(10)));
    assert_eq!(array.element_type(), &ParamType::Struct(struct1.id()));
}

#[test]
fn test_function1_request() {
    let interface = parse();
    assert_eq!(interface.function_count(), 3);

    let key = FunctionKey {
        function_id: element(&interface, "FunctionID", "Function1_id"),
        message_type: element(&interface, "messageType", "request"),
    };
    let function = interface.function(key).unwrap();
    assert_eq!(
        function.metadata(),
        &meta(
            "Function1",
            &["Description of request Function1"],
            &[],
            &["Function1 request todo"],
            &[]
        )
    );
    assert_eq!(function.key(), key);
    assert_eq!(function.platform(), None);
    assert_eq!(function.params().len(), 3);

    let param1 = function.param("param1").unwrap();
    assert_eq!(param1.meta, meta("param1", &[], &[], &[], &[("", "")]));
    assert!(!param1.is_mandatory);
    let ParamType::String(string) = &param1.param_type else {
        panic!("param1 should be String");
    };
    assert_eq!(string.max_length(), None);
    assert_eq!(param1.platform, None);
    assert_eq!(
        param1.default_value,
        Some(DefaultValue::String("String default value".to_string()))
    );

    let param2 = function.param("param2").unwrap();
    assert_eq!(
        param2.meta,
        meta("param2", &["Param2 description", ""], &[], &["Param2 todo"], &[])
    );
    assert!(param2.is_mandatory);
    assert!(matches!(&param2.param_type, ParamType::Integer(int) if int.min_value().is_none() && int.max_value().is_none()));
    assert_eq!(param2.platform.as_deref(), Some("param2 platform"));
    assert_eq!(param2.default_value, None);

    let param3 = function.param("param3").unwrap();
    assert_eq!(param3.meta, bare("param3"));
    assert!(!param3.is_mandatory);
    let struct1 = interface.struct_by_name("struct1").unwrap();
    assert_eq!(param3.param_type, ParamType::Struct(struct1.id()));
    assert_eq!(param3.platform, None);
    assert_eq!(param3.default_value, None);
}

#[test]
fn test_function1_response() {
    let interface = parse();
    let function = interface
        .function_by_names("Function1_id", "response")
        .unwrap();
    assert_eq!(
        function.metadata(),
        &meta("Function1", &[], &[], &[], &[("c1", ""), ("c2", "")])
    );
    assert_eq!(
        function.function_id(),
        element(&interface, "FunctionID", "Function1_id")
    );
    assert_eq!(
        function.message_type(),
        element(&interface, "messageType", "response")
    );
    assert_eq!(function.platform(), Some(""));

    let enum1 = interface.enum_by_name("enum1").unwrap();

    let p1 = function.param("p1").unwrap();
    assert_eq!(p1.meta, bare("p1"));
    assert!(p1.is_mandatory);
    assert_eq!(p1.param_type, ParamType::Enum(enum1.id()));
    assert_eq!(p1.default_value, None);

    let p2 = function.param("p2").unwrap();
    assert_eq!(p2.param_type, ParamType::Enum(enum1.id()));
    assert_eq!(p2.platform, None);
    let Some(DefaultValue::Element(default)) = p2.default_value else {
        panic!("p2 should default to an element");
    };
    assert_eq!(default, element(&interface, "enum1", "element2"));
    assert_eq!(interface.element(default).name(), "element2");

    let p3 = function.param("p3").unwrap();
    assert_eq!(p3.meta, meta("p3", &[], &[""], &[], &[]));
    assert!(p3.is_mandatory);
    assert_eq!(p3.param_type, ParamType::Boolean);
    assert_eq!(p3.default_value, Some(DefaultValue::Boolean(false)));
}

#[test]
fn test_function2_notification() {
    let interface = parse();
    let function = interface
        .function_by_names("Function2_id", "notification")
        .unwrap();
    assert_eq!(
        function.metadata(),
        &meta("Function2", &["Function2 description"], &[], &[], &[])
    );
    assert_eq!(function.platform(), Some("function2 platform"));
    assert_eq!(interface.element(function.function_id()).value(), 11);
    assert_eq!(function.params().len(), 3);

    let enum1 = interface.enum_by_name("enum1").unwrap();
    let names = |allowed: &[(String, ElementRef)]| {
        allowed
            .iter()
            .map(|(name, handle)| {
                assert_eq!(Some(*handle), enum1.element_ref(name));
                name.clone()
            })
            .collect::<Vec<_>>()
    };

    let n1 = function.param("n1").unwrap();
    assert_eq!(n1.meta, meta("n1", &[], &[], &["n1 todo"], &[]));
    assert!(n1.is_mandatory);
    let ParamType::EnumSubset(subset) = &n1.param_type else {
        panic!("n1 should be an enum subset");
    };
    assert_eq!(subset.enum_id(), enum1.id());
    assert_eq!(names(subset.allowed_elements()), vec!["element2", "element3"]);
    assert!(!subset.allows(element(&interface, "enum1", "element1")));
    assert_eq!(n1.platform, None);
    assert_eq!(n1.default_value, None);

    let n2 = function.param("n2").unwrap();
    assert_eq!(n2.meta, meta("n2", &[], &[], &["n2 todo"], &[]));
    let ParamType::Array(array) = &n2.param_type else {
        panic!("n2 should be Array");
    };
    assert_eq!((array.min_size(), array.max_size()), (Some(1), Some(100)));
    let ParamType::EnumSubset(subset) = array.element_type() else {
        panic!("n2 elements should be an enum subset");
    };
    assert_eq!(subset.enum_id(), enum1.id());
    assert_eq!(names(subset.allowed_elements()), vec!["element1", "element3"]);

    let n3 = function.param("n3").unwrap();
    assert_eq!(n3.meta, bare("n3"));
    assert!(!n3.is_mandatory);
    let struct2 = interface.struct_by_name("struct2").unwrap();
    assert_eq!(n3.param_type, ParamType::Struct(struct2.id()));
}

#[test]
fn test_function_keys_are_unique() {
    let interface = parse();
    let keys: Vec<_> = interface.functions().map(|f| f.key()).collect();
    assert_eq!(keys.len(), 3);
    for (i, key) in keys.iter().enumerate() {
        assert!(!keys[i + 1..].contains(key));
        assert_eq!(interface.function(*key).unwrap().key(), *key);
    }
}

#[test]
fn test_fixture_is_lint_clean() {
    assert!(lint(&parse()).is_empty());
}
