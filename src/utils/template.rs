//! String template rendering utilities.

pub struct TemplateVars;

impl TemplateVars {
    pub const PROJECT_NAME: &'static str = "projectName";
    pub const IMAGE: &'static str = "image";
    pub const KIND: &'static str = "kind";
    pub const KIND_SINGULAR: &'static str = "kindSingular";
    pub const KIND_PLURAL: &'static str = "kindPlural";
    pub const GROUP: &'static str = "group";
    pub const VERSION: &'static str = "version";
}

pub fn render(template: &str, variables: &[(&str, &str)]) -> String {
    let mut result = template.to_string();

    for (key, value) in variables {
        let placeholder = format!("{{{{{}}}}}", key);
        result = result.replace(&placeholder, value);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_replaces_every_occurrence() {
        let out = render(
            "name: {{projectName}}\ncommand: [{{projectName}}]",
            &[(TemplateVars::PROJECT_NAME, "app-operator")],
        );
        assert_eq!(out, "name: app-operator\ncommand: [app-operator]");
    }

    #[test]
    fn render_leaves_unknown_placeholders() {
        let out = render("{{image}} {{other}}", &[(TemplateVars::IMAGE, "img:v1")]);
        assert_eq!(out, "img:v1 {{other}}");
    }
}
