//! Semantic class classification
//!
//! Separates class names that carry domain meaning (`product-card`,
//! `price_color`) from layout, spacing and utility-framework noise
//! (`flex`, `mt-4`, `text-gray-500`, `md:w-1/2`). Selectors built from the
//! survivors stay stable across pages of the same site.

use std::sync::LazyLock;

use regex::Regex;

use crate::document::DocumentElement;

/// Common utility and grid-framework class names
const UTILITY_CLASSES: &[&str] = &[
    // layout
    "container", "container-fluid", "wrapper", "row", "col", "column", "columns",
    "clearfix", "block", "inline", "inline-block", "hidden", "visible", "invisible",
    "relative", "absolute", "fixed", "sticky", "static", "overflow-hidden",
    "overflow-auto", "float-left", "float-right", "pull-left", "pull-right",
    // flex / grid
    "flex", "inline-flex", "flex-row", "flex-col", "flex-column", "flex-wrap",
    "flex-1", "flex-auto", "flex-none", "flex-grow", "flex-shrink", "grow", "shrink",
    "grid", "inline-grid", "d-flex", "d-block", "d-none", "d-inline", "d-inline-block",
    "d-grid", "items-center", "items-start", "items-end", "items-stretch",
    "justify-center", "justify-between", "justify-around", "justify-start",
    "justify-end", "justify-content-center", "justify-content-between",
    "align-items-center", "align-center", "self-center", "content-center",
    "place-items-center",
    // sizing
    "w-full", "h-full", "w-auto", "h-auto", "w-screen", "h-screen", "min-h-screen",
    "max-w-full", "full-width",
    // typography
    "text-left", "text-right", "text-center", "text-justify", "uppercase",
    "lowercase", "capitalize", "italic", "underline", "no-underline", "truncate",
    "whitespace-nowrap", "break-words", "leading-tight", "leading-normal",
    "leading-relaxed", "tracking-tight", "tracking-wide", "antialiased",
    // borders / effects
    "border", "border-0", "border-t", "border-b", "border-l", "border-r", "rounded",
    "rounded-sm", "rounded-md", "rounded-lg", "rounded-xl", "rounded-full",
    "shadow", "shadow-sm", "shadow-md", "shadow-lg", "shadow-xl", "transition",
    "transition-all", "duration-200", "duration-300", "ease-in-out", "opacity-0",
    "opacity-50", "opacity-100", "cursor-pointer", "pointer-events-none",
    "select-none", "sr-only", "not-sr-only",
    // framework grid
    "col-xs-12", "col-sm-6", "col-md-4", "col-md-6", "col-lg-3", "col-lg-4",
    "col-lg-6", "mx-auto", "my-auto", "m-auto", "active", "disabled", "show", "fade",
    "in", "first", "last", "odd", "even",
];

/// Class names usable unescaped after `.` in a selector: an optional hyphen,
/// then a letter, `_` or non-ASCII character, then name characters
static CSS_IDENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^-?(?:[_a-zA-Z]|[^\x00-\x7F])(?:[_a-zA-Z0-9-]|[^\x00-\x7F])*$")
        .expect("Invalid css-ident regex")
});

/// Responsive and state variant prefixes
static VARIANT_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(sm|md|lg|xl|2xl|hover|focus|focus-within|focus-visible|active|visited|disabled|dark|group-hover|peer-hover|first|last|odd|even|motion-safe|motion-reduce|print):",
    )
    .expect("Invalid variant-prefix regex")
});

/// Margin / padding utilities: `mt-4`, `-mx-2`, `p-[3px]`, `py-0.5`
static SPACING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^-?(m|p)(t|r|b|l|x|y|s|e)?-(\d+(\.\d+)?|px|auto|\[.+\])$")
        .expect("Invalid spacing regex")
});

/// Sizing and offset utilities: `w-64`, `max-w-lg`, `h-1/2`, `gap-x-4`
static SIZING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^-?(w|h|min-w|min-h|max-w|max-h|size|gap|gap-x|gap-y|space-x|space-y|inset|top|right|bottom|left|z|basis)-(\d+(\.\d+)?|\d+/\d+|px|auto|full|screen|min|max|fit|none|xs|sm|md|lg|xl|\dxl|prose|\[.+\])$",
    )
    .expect("Invalid sizing regex")
});

/// Generated palette colours: `text-gray-500`, `bg-blue-50`, `ring-red-950`
static COLOR_SCALE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(text|bg|border|ring|from|via|to|fill|stroke|divide|outline|accent|decoration)-(slate|gray|grey|zinc|neutral|stone|red|orange|amber|yellow|lime|green|emerald|teal|cyan|sky|blue|indigo|violet|purple|fuchsia|pink|rose|black|white)(-(50|[1-9]00|950))?$",
    )
    .expect("Invalid colour-scale regex")
});

static GRID_SPAN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(grid-(cols|rows)-\d+|(col|row)-span-(\d+|full)|(col|row)-(start|end)-\d+)$")
        .expect("Invalid grid-span regex")
});

static TEXT_SIZE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^text-(xs|sm|base|md|lg|xl|[2-9]xl)$").expect("Invalid text-size regex")
});

static FONT_WEIGHT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^font-(thin|extralight|light|normal|medium|semibold|bold|extrabold|black)$")
        .expect("Invalid font-weight regex")
});

/// True if `class_name` is meaningful enough to appear in a generated selector
pub fn is_semantic(class_name: &str) -> bool {
    if class_name.is_empty() || UTILITY_CLASSES.contains(&class_name) {
        return false;
    }

    if !CSS_IDENT.is_match(class_name) {
        return false;
    }

    let heuristics: [&LazyLock<Regex>; 7] = [
        &VARIANT_PREFIX,
        &SPACING,
        &SIZING,
        &COLOR_SCALE,
        &GRID_SPAN,
        &TEXT_SIZE,
        &FONT_WEIGHT,
    ];

    !heuristics.iter().any(|re| re.is_match(class_name))
}

/// Semantic classes of `element` in attribute order, duplicates removed
pub fn semantic_classes<'a, E: DocumentElement<'a>>(element: &E) -> Vec<&'a str> {
    let mut classes: Vec<&'a str> = Vec::new();
    for class in element.classes() {
        if is_semantic(class) && !classes.contains(&class) {
            classes.push(class);
        }
    }
    classes
}

/// `tag.first-semantic-class`, or just `tag` when the element has none
pub fn selector_fragment<'a, E: DocumentElement<'a>>(element: &E) -> String {
    match semantic_classes(element).first() {
        Some(class) => format!("{}.{}", element.tag_name(), class),
        None => element.tag_name().to_string(),
    }
}
