use tera::{Context, Tera};

use careguide_core::models::report::HealthReport;

use crate::error::ExportError;

/// Markdown rendering of a [`HealthReport`]. Context variables are the
/// report's serialized fields.
pub const REPORT_TEMPLATE: &str = r#"# Health Engagement Report

Generated {{ generated_at }} with `{{ model_id }}`
{%- if sources %}
Records: {{ sources | join(sep=", ") }}
{%- endif %}

## Health Engagement Score: {{ score.score }}/100

{{ score.done }} of {{ score.total }} recommended activities completed, {{ score.not_done }} not done, {{ score.unclear }} need confirmation.

## Patient Summary

{{ summary.advanced_summary }}
{% if summary.conditions %}
**Conditions:** {{ summary.conditions | join(sep=", ") }}
{% endif %}
{%- if summary.risk_factors %}
**Risk factors:** {{ summary.risk_factors | join(sep=", ") }}
{% endif %}
## Recommended Activities

| ID | Activity | Grade | Status | Urgency |
|----|----------|-------|--------|---------|
{% for a in assessments -%}
| {{ a.recommendation_id }} | {{ a.description }} | {% if a.evidence_grade %}{{ a.evidence_grade }}{% else %}-{% endif %} | {% if a.status == "done" %}Done{% elif a.status == "not_done" %}Not done{% else %}Needs confirmation{% endif %} | {{ a.urgency }} |
{% endfor %}
{%- set done = assessments | filter(attribute="status", value="done") %}
{%- if done %}
## Evidence of Completed Activities
{% for a in done %}
- **{{ a.description }}**{% if a.completion_date %} ({{ a.completion_date }}){% endif %}: "{{ a.supporting_quote }}"
{%- endfor %}
{% endif %}
{%- if clarifying_questions %}
## Questions for You
{% for q in clarifying_questions %}
- [{{ q.recommendation_id }}] {{ q.question }}
{%- endfor %}
{% endif %}
## Details
{% for r in recommendations %}
### {{ r.id }}: {{ r.description }}

{% if r.details %}{{ r.details }}
{% endif %}
- Frequency: {% if r.frequency %}{{ r.frequency }}{% else %}as directed{% endif %}
- Category: {{ r.category }}
- Source: {{ r.source }}
{%- if r.rationale %}
- Why: {{ r.rationale }}
{%- endif %}
{% endfor %}
---
Estimated model cost: ${{ total_cost_usd | round(precision=4) }} over {{ transactions | length }} model calls.
"#;

/// Render a Tera template with a report as its context.
pub fn render_template(
    template_name: &str,
    template_content: &str,
    report: &HealthReport,
) -> Result<String, ExportError> {
    let mut tera = Tera::default();
    tera.add_raw_template(template_name, template_content)
        .map_err(|e| ExportError::TemplateParse(e.to_string()))?;

    let value = serde_json::to_value(report)?;
    let context = Context::from_value(value)
        .map_err(|e| ExportError::TemplateRender(e.to_string()))?;

    let rendered = tera.render(template_name, &context)?;
    Ok(rendered)
}

/// Render the built-in Markdown report.
pub fn render_markdown(report: &HealthReport) -> Result<String, ExportError> {
    render_template("report.md", REPORT_TEMPLATE, report)
}
