use maud::Markup;
use scraper::{ElementRef, Html, Selector};

pub(crate) fn parse_html_document(markup: &Markup) -> Html {
    Html::parse_document(&markup.0)
}

pub(crate) fn parse_html_fragment(markup: &Markup) -> Html {
    Html::parse_fragment(&markup.0)
}

#[track_caller]
pub(crate) fn assert_valid_html(html: &Html) {
    assert!(
        html.errors.is_empty(),
        "Got HTML parsing errors: {:?}",
        html.errors
    );
}

#[track_caller]
pub(crate) fn select_all<'a>(html: &'a Html, selector: &str) -> Vec<ElementRef<'a>> {
    let selector = Selector::parse(selector).unwrap();
    html.select(&selector).collect()
}

#[track_caller]
pub(crate) fn must_select_text(html: &Html, selector: &str) -> String {
    let elements = select_all(html, selector);
    let element = elements
        .first()
        .unwrap_or_else(|| panic!("No element matches {selector}"));

    element.text().collect::<String>().trim().to_owned()
}
