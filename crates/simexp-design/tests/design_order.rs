use serde_json::json;
use simexp_core::{FlatMap, ParamTree, SimExpError, Value};
use simexp_design::{from_yaml_slice, generate, DesignPlan, Levels, Strategy};

fn plan(value: serde_json::Value) -> DesignPlan {
    serde_json::from_value(value).expect("plan")
}

fn param_rows(plan: &DesignPlan) -> Vec<Vec<(String, Value)>> {
    plan.experiments()
        .expect("experiments")
        .map(|experiment| {
            experiment
                .params()
                .iter()
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect()
        })
        .collect()
}

fn row(entries: &[(&str, i64)]) -> Vec<(String, Value)> {
    entries
        .iter()
        .map(|(key, value)| (key.to_string(), Value::Int(*value)))
        .collect()
}

#[test]
fn element_wise_takes_matching_positions() {
    let plan = plan(json!({
        "models": ["M", "M", "M"],
        "params": {"p": [1, 2, 3]},
        "strategy": "element-wise",
    }));
    assert_eq!(
        param_rows(&plan),
        vec![row(&[("p", 1)]), row(&[("p", 2)]), row(&[("p", 3)])]
    );
}

#[test]
fn one_factor_at_a_time_starts_from_baseline() {
    let plan = plan(json!({
        "models": ["M"],
        "params": {"x": [1, 2, 3], "y": [10, 20]},
        "strategy": "one-factor-at-a-time",
    }));
    assert_eq!(
        param_rows(&plan),
        vec![
            row(&[("x", 1), ("y", 10)]),
            row(&[("x", 2), ("y", 10)]),
            row(&[("x", 3), ("y", 10)]),
            row(&[("x", 1), ("y", 20)]),
        ]
    );
}

#[test]
fn one_factor_at_a_time_sweeps_models_and_args() {
    let plan = plan(json!({
        "models": ["A", "B"],
        "params": {"x": [1, 2]},
        "args": {"stopTime": [1, 5]},
        "strategy": "ofat",
    }));
    let rows: Vec<(String, Value, Value)> = plan
        .experiments()
        .expect("experiments")
        .map(|e| (e.model().to_string(), e.params()["x"].clone(), e.args()["stopTime"].clone()))
        .collect();
    assert_eq!(
        rows,
        vec![
            ("A".to_string(), Value::Int(1), Value::Int(1)),
            ("B".to_string(), Value::Int(1), Value::Int(1)),
            ("A".to_string(), Value::Int(2), Value::Int(1)),
            ("A".to_string(), Value::Int(1), Value::Int(5)),
        ]
    );
}

#[test]
fn full_factorial_cycles_last_factor_fastest() {
    let plan = plan(json!({
        "models": ["M"],
        "params": {"a": [1, 2], "b": [10, 20]},
        "strategy": "full-factorial",
    }));
    assert_eq!(
        param_rows(&plan),
        vec![
            row(&[("a", 1), ("b", 10)]),
            row(&[("a", 1), ("b", 20)]),
            row(&[("a", 2), ("b", 10)]),
            row(&[("a", 2), ("b", 20)]),
        ]
    );
}

#[test]
fn full_factorial_varies_models_slowest_and_args_fastest() {
    let plan = plan(json!({
        "models": ["A", "B"],
        "params": {"p": [1, 2]},
        "args": {"stopTime": [10, 20]},
    }));
    let rows: Vec<String> = plan
        .experiments()
        .expect("experiments")
        .map(|e| format!("{}:{}:{}", e.model(), e.params()["p"], e.args()["stopTime"]))
        .collect();
    assert_eq!(
        rows,
        [
            "A:1:10", "A:1:20", "A:2:10", "A:2:20", "B:1:10", "B:1:20", "B:2:10", "B:2:20",
        ]
    );
}

#[test]
fn nested_params_flatten_in_declaration_order() {
    // YAML keeps mapping order; `json!` objects would come back sorted.
    let plan: DesignPlan = from_yaml_slice(
        b"models: [Modelica.Mechanics.MultiBody.Examples.Systems.RobotR3.oneAxis]\n\
          params: {axis: {motor: {i_max: [5, 15], Ra: {R: [200, 300]}}}}\n",
    )
    .expect("plan");
    let rendered: Vec<String> = plan
        .experiments()
        .expect("experiments")
        .map(|e| e.modifier())
        .collect();
    assert_eq!(
        rendered,
        [
            "(axis(motor(i_max=5, Ra(R=200))))",
            "(axis(motor(i_max=5, Ra(R=300))))",
            "(axis(motor(i_max=15, Ra(R=200))))",
            "(axis(motor(i_max=15, Ra(R=300))))",
        ]
    );
}

#[test]
fn element_wise_rejects_unequal_lengths() {
    let plan = plan(json!({
        "models": ["M", "M", "M"],
        "params": {"p": [1, 2, 3], "q": [1, 2]},
        "strategy": "aslisted",
    }));
    let err = plan.experiments().expect_err("shape mismatch");
    match err {
        SimExpError::ShapeMismatch(info) => {
            assert_eq!(info.context["argument"], "params.q");
            assert_eq!(info.context["expected"], "3");
            assert_eq!(info.context["found"], "2");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn bare_scalar_parameter_is_named_in_the_error() {
    let plan = plan(json!({
        "models": ["M"],
        "params": {"L": {"L": 18}},
    }));
    match plan.experiments().expect_err("bare scalar") {
        SimExpError::InvalidDesignInput(info) => {
            assert_eq!(info.context["argument"], "params.L.L");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn bare_scalar_argument_is_named_in_the_error() {
    let plan = plan(json!({
        "models": ["M"],
        "args": {"stopTime": 2500},
    }));
    match plan.experiments().expect_err("bare scalar") {
        SimExpError::InvalidDesignInput(info) => {
            assert_eq!(info.code, "design-not-a-list");
            assert_eq!(info.context["argument"], "args.stopTime");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn one_factor_at_a_time_requires_a_baseline() {
    let plan = plan(json!({
        "models": ["M"],
        "args": {"stopTime": []},
        "strategy": "ofat",
    }));
    assert!(matches!(
        plan.experiments(),
        Err(SimExpError::InvalidDesignInput(_))
    ));
}

#[test]
fn full_factorial_with_an_empty_list_is_empty() {
    let plan = plan(json!({
        "models": ["M"],
        "params": {"a": [1, 2], "b": []},
    }));
    assert_eq!(plan.experiments().expect("experiments").count(), 0);
}

#[test]
fn sequence_is_lazy_and_reports_its_length() {
    let values: Vec<Value> = (0..100).map(Value::from).collect();
    let mut params = ParamTree::new();
    for name in ["a", "b", "c", "d"] {
        params.insert(
            name.to_string(),
            simexp_core::ParamNode::Leaf(Levels::List(values.clone())),
        );
    }
    let mut experiments = generate(
        Levels::List(vec!["M".to_string()]),
        params,
        FlatMap::new(),
        Strategy::FullFactorial,
    )
    .expect("experiments");
    assert_eq!(experiments.len(), 100_000_000);
    let first = experiments.next().expect("first");
    assert_eq!(first.params()["d"], Value::Int(0));
    let second = experiments.next().expect("second");
    assert_eq!(second.params()["d"], Value::Int(1));
    assert_eq!(experiments.len(), 99_999_998);
}
