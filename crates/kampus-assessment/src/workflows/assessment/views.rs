use chrono::{Datelike, Utc};

use super::domain::{Choice, QuestionId};

/// Assessment form with the identity fields and one radio group per question.
pub fn form_page(company: &str) -> String {
    let company = escape_html(company);
    let questions: String = QuestionId::all().map(question_block).collect();

    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{company} Psychometric Test</title>\n</head>\n<body>\n\
         <h1>{company} Psychometric Test</h1>\n\
         <form method=\"post\" action=\"/submit\">\n\
         <label>Full name <input type=\"text\" name=\"name\" required></label>\n\
         <label>Email <input type=\"email\" name=\"email\" required></label>\n\
         <label>Position applied for <input type=\"text\" name=\"position\"></label>\n\
         {questions}\
         <button type=\"submit\">Submit assessment</button>\n\
         </form>\n{footer}</body>\n</html>\n",
        footer = footer(&company),
    )
}

/// Confirmation shown after a successful submission. Never shows the result.
pub fn thank_you_page(company: &str, name: &str) -> String {
    let company = escape_html(company);
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>Thank you</title>\n</head>\n<body>\n\
         <h1>Thank you, {name}!</h1>\n\
         <p>Your responses to the {company} Psychometric Test have been received. \
         Our HR team will review your results and contact you shortly.</p>\n\
         {footer}</body>\n</html>\n",
        name = escape_html(name),
        footer = footer(&company),
    )
}

pub fn error_page(company: &str, message: &str) -> String {
    let company = escape_html(company);
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>Submission problem</title>\n</head>\n<body>\n\
         <h1>We could not accept your submission</h1>\n<p>{message}</p>\n\
         <p><a href=\"/\">Return to the assessment</a></p>\n{footer}</body>\n</html>\n",
        message = escape_html(message),
        footer = footer(&company),
    )
}

fn question_block(question: QuestionId) -> String {
    let field = question.field_name();
    let options: String = Choice::ordered()
        .into_iter()
        .map(|choice| {
            format!(
                "<label><input type=\"radio\" name=\"{field}\" value=\"{letter}\"> {letter}</label>\n",
                letter = choice.letter()
            )
        })
        .collect();
    format!(
        "<fieldset>\n<legend>Question {index}</legend>\n{options}</fieldset>\n",
        index = question.index()
    )
}

fn footer(company: &str) -> String {
    format!("<footer>&copy; {} {company}</footer>\n", Utc::now().year())
}

pub(crate) fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}
