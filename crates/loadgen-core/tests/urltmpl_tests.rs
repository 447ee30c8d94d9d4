use loadgen_core::urltmpl::{resolve, substitute_request_parts};

#[test]
fn replaces_protocol_host_port_and_context_root() {
    let result = substitute_request_parts(
        "$PROTOCOL$://$HOST$:$PORT$/$CONTEXTROOT$/sleep",
        "http://localhost:8080/api/test",
    );
    assert_eq!(result, "http://localhost:8080/api/sleep");
}

#[test]
fn drops_the_port_token_when_the_request_has_no_port() {
    let result = substitute_request_parts(
        "$PROTOCOL$://$HOST$:$PORT$/$CONTEXTROOT$/api/sleep",
        "https://host.example/root/api/test",
    );
    assert_eq!(result, "https://host.example/root/api/sleep");
}

#[test]
fn context_root_is_empty_without_a_second_path_segment() {
    let result = substitute_request_parts(
        "$PROTOCOL$://$HOST$:$PORT$/$CONTEXTROOT$/x",
        "http://localhost:8080/test",
    );
    assert_eq!(result, "http://localhost:8080//x");
}

#[test]
fn leaves_placeholders_when_the_request_url_is_malformed() {
    let template = "$PROTOCOL$://$HOST$:$PORT$/x";
    assert_eq!(substitute_request_parts(template, "not a url"), template);
}

#[test]
fn applies_base_substitution_before_everything_else() {
    let result = resolve(
        "$BASE$/fib?input=1",
        "http://localhost:8080/api/test",
        Some("$PROTOCOL$://$HOST$:$PORT$/api/test"),
        false,
    );
    assert_eq!(result, "http://localhost:8080/api/test/fib?input=1");
}

#[test]
fn force_ssl_rewrites_the_scheme_last() {
    let result = resolve(
        "$PROTOCOL$://$HOST$:$PORT$/$CONTEXTROOT$/sleep",
        "http://localhost:8080/api/test",
        None,
        true,
    );
    assert_eq!(result, "https://localhost:8080/api/sleep");
}
