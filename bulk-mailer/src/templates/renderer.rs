//! Template rendering with variable substitution

use crate::templates::{EmailTemplate, Recipient};

/// Renders email templates by substituting recipient fields
pub struct TemplateRenderer;

impl TemplateRenderer {
    /// Render a string with variable substitution
    ///
    /// Every `{{key}}` where `key` is a field of `recipient` is replaced by the
    /// field value, everywhere it occurs. Matching is exact and case-sensitive.
    /// Placeholders naming a field the recipient does not have are left as-is.
    ///
    /// Values are inserted verbatim: the body is sent as HTML and nothing is
    /// escaped.
    pub fn render(template_str: &str, recipient: &Recipient) -> String {
        let mut result = template_str.to_string();

        for (key, value) in recipient.fields() {
            let placeholder = format!("{{{{{}}}}}", key);
            result = result.replace(&placeholder, value);
        }

        result
    }

    /// Render subject and body for one recipient
    ///
    /// # Returns
    /// Rendered `(subject, body)`
    pub fn render_template(template: &EmailTemplate, recipient: &Recipient) -> (String, String) {
        let subject = Self::render(&template.subject, recipient);
        let body = Self::render(&template.body, recipient);
        (subject, body)
    }

    /// Extract all variable names from a template string
    ///
    /// Returns the distinct names found between `{{` and `}}`, sorted.
    /// Names are kept exactly as written, surrounding spaces included, so a
    /// name here is one `render` would fill from a field of that name.
    pub fn extract_variables(template_str: &str) -> Vec<String> {
        let mut variables = Vec::new();
        let mut chars = template_str.chars().peekable();

        while let Some(c) = chars.next() {
            if c == '{' && chars.peek() == Some(&'{') {
                chars.next(); // consume second {

                let mut var_name = String::new();
                while let Some(ch) = chars.next() {
                    if ch == '}' && chars.peek() == Some(&'}') {
                        chars.next(); // consume second }
                        if !var_name.is_empty() {
                            variables.push(var_name);
                        }
                        break;
                    } else {
                        var_name.push(ch);
                    }
                }
            }
        }

        // Remove duplicates
        variables.sort();
        variables.dedup();
        variables
    }

    /// Placeholders in `template` that `recipient` has no field for
    pub fn missing_variables(template: &EmailTemplate, recipient: &Recipient) -> Vec<String> {
        let mut names = Self::extract_variables(&template.subject);
        names.extend(Self::extract_variables(&template.body));
        // Subject and body may share names
        names.sort();
        names.dedup();
        names.retain(|name| !recipient.contains(name));
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recipient(pairs: &[(&str, &str)]) -> Recipient {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_render_basic_variables() {
        let r = recipient(&[("name", "John Doe"), ("company", "Acme Inc")]);

        let rendered = TemplateRenderer::render("Hello {{name}} from {{company}}!", &r);

        assert_eq!(rendered, "Hello John Doe from Acme Inc!");
    }

    #[test]
    fn test_render_replaces_every_occurrence() {
        let r = recipient(&[("name", "Ada")]);

        let rendered = TemplateRenderer::render("{{name}}, {{name}} and {{name}}", &r);

        assert_eq!(rendered, "Ada, Ada and Ada");
    }

    #[test]
    fn test_unknown_placeholder_left_literal() {
        let r = recipient(&[("email", "a@x.com")]);

        let rendered = TemplateRenderer::render("Hi {{name}} <{{email}}>", &r);

        assert_eq!(rendered, "Hi {{name}} <a@x.com>");
    }

    #[test]
    fn test_render_is_case_sensitive_and_exact() {
        let r = recipient(&[("name", "Ada")]);

        let rendered = TemplateRenderer::render("{{Name}} {{ name }} {{name}}", &r);

        assert_eq!(rendered, "{{Name}} {{ name }} Ada");
    }

    #[test]
    fn test_values_are_not_escaped() {
        let r = recipient(&[("link", "<a href=\"https://x.com\">x & y</a>")]);

        let rendered = TemplateRenderer::render("<p>{{link}}</p>", &r);

        assert_eq!(rendered, "<p><a href=\"https://x.com\">x & y</a></p>");
    }

    #[test]
    fn test_render_template_fills_subject_and_body() {
        let template = EmailTemplate::new("Welcome {{name}}", "<p>Hi {{name}}</p>");
        let r = recipient(&[("email", "b@x.com"), ("name", "B")]);

        let (subject, body) = TemplateRenderer::render_template(&template, &r);

        assert_eq!(subject, "Welcome B");
        assert_eq!(body, "<p>Hi B</p>");
    }

    #[test]
    fn test_extract_variables() {
        let template = "Hello {{name}}, your order {{order_id}} is ready. Bye {{name}}";
        let vars = TemplateRenderer::extract_variables(template);

        assert_eq!(vars, vec!["name", "order_id"]);
    }

    #[test]
    fn test_extract_ignores_empty_and_unterminated() {
        let vars = TemplateRenderer::extract_variables("{{}} {single} {{open");
        assert!(vars.is_empty());
    }

    #[test]
    fn test_extract_keeps_names_exact() {
        let vars = TemplateRenderer::extract_variables("Hi {{ name }} and {{name}}");
        assert_eq!(vars, vec![" name ", "name"]);

        // Only the exact spelling is filled by render
        let r = recipient(&[("name", "Ada")]);
        assert_eq!(
            TemplateRenderer::render("Hi {{ name }} and {{name}}", &r),
            "Hi {{ name }} and Ada"
        );
    }

    #[test]
    fn test_missing_variables() {
        let template = EmailTemplate::new("Hi {{name}}", "Your code is {{code}} ({{email}})");
        let r = recipient(&[("email", "c@x.com"), ("name", "C")]);

        assert_eq!(TemplateRenderer::missing_variables(&template, &r), vec!["code"]);
    }
}
