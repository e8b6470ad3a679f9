use std::collections::BTreeMap;

/// Source of the virtual query module. `GQL_URL` and `GQL_HEADERS` are
/// substituted with JSON literals when the module is loaded.
///
/// `query` arrives already encoded as a JSON string by the call site rewrite,
/// so it is spliced into the body without further encoding.
pub const RUNTIME_TEMPLATE: &str = r#"export default async function gql(query, variables) {
	const variables_body = variables
		? `,"variables":${JSON.stringify(variables)}`
		: '';
	const response = await fetch(GQL_URL, {
		method: 'POST',
		headers: GQL_HEADERS,
		body: `{"query":${query}${variables_body}}`,
	});
	if (!response.ok) {
		throw new Error(
			`GQL error: ${response.statusText} ${await response.text()}`,
		);
	}
	return response.json();
}
"#;

/// The runtime module for an endpoint.
#[must_use]
pub fn runtime_module(url: &str, headers: &BTreeMap<String, String>) -> String {
    let url = serde_json::Value::String(url.to_string()).to_string();
    let headers = serde_json::Value::Object(
        headers
            .iter()
            .map(|(name, value)| (name.clone(), serde_json::Value::String(value.clone())))
            .collect(),
    )
    .to_string();

    RUNTIME_TEMPLATE
        .replace("GQL_URL", &url)
        .replace("GQL_HEADERS", &headers)
}
