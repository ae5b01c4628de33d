//! FFI interface for C/C++ interop
//!
//! Provides C-compatible functions for inferring a schema from HTML.
//! Options and results are passed as JSON.

use std::ffi::{c_char, CStr, CString};
use std::ptr;

use crate::document::HtmlDocument;
use crate::inference::{analyze, rank_patterns, InferOptions};

/// Result struct returned to C/C++
/// Both pointers are owned by Rust and must be freed via free_schema_result
#[repr(C)]
pub struct SchemaResultFFI {
    /// JSON-serialized result (null-terminated)
    pub json_ptr: *mut c_char,
    /// Error message if inference failed (null-terminated), or null on success
    pub error_ptr: *mut c_char,
}

/// Infer an extraction schema from an HTML document.
///
/// # Arguments
/// * `html_ptr` - Pointer to HTML content (UTF-8, not necessarily null-terminated)
/// * `html_len` - Length of HTML content in bytes
/// * `url` - Page URL recorded in the schema (null-terminated), may be null
/// * `options_json` - JSON-serialized InferOptions (null-terminated), may be null for defaults
///
/// # Returns
/// SchemaResultFFI with json_ptr set to the serialized Analysis, or error_ptr set
///
/// # Safety
/// - `html_ptr` must point to valid memory of at least `html_len` bytes
/// - `url` and `options_json` must be null or valid null-terminated C strings
/// - Caller must free the result via `free_schema_result`
#[no_mangle]
pub unsafe extern "C" fn infer_schema_from_html(
    html_ptr: *const c_char,
    html_len: usize,
    url: *const c_char,
    options_json: *const c_char,
) -> SchemaResultFFI {
    let (doc, options) = match read_inputs(html_ptr, html_len, url, options_json) {
        Ok(inputs) => inputs,
        Err(msg) => return make_error_result(&msg),
    };

    match analyze(&doc, &options) {
        Ok(analysis) => {
            tracing::debug!(
                container = %analysis.schema.container_selector,
                fields = analysis.schema.fields.len(),
                "schema inferred"
            );
            make_json_result(&analysis)
        }
        Err(e) => {
            tracing::debug!(error = %e, "schema inference failed");
            make_error_result(&e.to_string())
        }
    }
}

/// Rank candidate patterns without extracting fields (convenience function)
///
/// # Safety
/// Same as infer_schema_from_html
#[no_mangle]
pub unsafe extern "C" fn rank_patterns_from_html(
    html_ptr: *const c_char,
    html_len: usize,
    options_json: *const c_char,
) -> SchemaResultFFI {
    let (doc, options) = match read_inputs(html_ptr, html_len, ptr::null(), options_json) {
        Ok(inputs) => inputs,
        Err(msg) => return make_error_result(&msg),
    };

    match rank_patterns(&doc, &options) {
        Ok(patterns) => make_json_result(&patterns),
        Err(e) => make_error_result(&e.to_string()),
    }
}

/// Free a SchemaResultFFI returned by this module
///
/// # Safety
/// - `result` must have been returned by `infer_schema_from_html` or `rank_patterns_from_html`
/// - Must only be called once per result
#[no_mangle]
pub unsafe extern "C" fn free_schema_result(result: SchemaResultFFI) {
    if !result.json_ptr.is_null() {
        drop(CString::from_raw(result.json_ptr));
    }
    if !result.error_ptr.is_null() {
        drop(CString::from_raw(result.error_ptr));
    }
}

// Decode the raw pointers into a parsed document and options
unsafe fn read_inputs(
    html_ptr: *const c_char,
    html_len: usize,
    url: *const c_char,
    options_json: *const c_char,
) -> Result<(HtmlDocument, InferOptions), String> {
    let html = if html_ptr.is_null() || html_len == 0 {
        ""
    } else {
        let slice = std::slice::from_raw_parts(html_ptr as *const u8, html_len);
        std::str::from_utf8(slice).map_err(|_| "Invalid UTF-8 in HTML content".to_string())?
    };

    let url = if url.is_null() {
        ""
    } else {
        CStr::from_ptr(url)
            .to_str()
            .map_err(|_| "Invalid UTF-8 in URL".to_string())?
    };

    let options = if options_json.is_null() {
        InferOptions::default()
    } else {
        let raw = CStr::from_ptr(options_json)
            .to_str()
            .map_err(|_| "Invalid UTF-8 in options JSON".to_string())?;
        serde_json::from_str(raw).map_err(|e| format!("Failed to parse options JSON: {}", e))?
    };

    Ok((HtmlDocument::parse(url, html), options))
}

// Helper to serialize a successful result
fn make_json_result<T: serde::Serialize>(value: &T) -> SchemaResultFFI {
    match serde_json::to_string(value) {
        Ok(json) => match CString::new(json) {
            Ok(cstr) => SchemaResultFFI {
                json_ptr: cstr.into_raw(),
                error_ptr: ptr::null_mut(),
            },
            Err(_) => make_error_result("Result JSON contains null bytes"),
        },
        Err(e) => make_error_result(&format!("Failed to serialize result: {}", e)),
    }
}

// Helper to create error result
fn make_error_result(msg: &str) -> SchemaResultFFI {
    let error_cstr = CString::new(msg.replace('\0', " ")).unwrap_or_default();
    SchemaResultFFI {
        json_ptr: ptr::null_mut(),
        error_ptr: error_cstr.into_raw(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HTML: &str = r#"
    <ul>
        <li class="item extra">Alpha <a href="/1">one</a></li>
        <li class="item extra">Beta <a href="/2">two</a></li>
        <li class="item extra">Gamma <a href="/3">three</a></li>
    </ul>
    "#;

    unsafe fn take(result: SchemaResultFFI) -> (Option<String>, Option<String>) {
        let json = (!result.json_ptr.is_null())
            .then(|| CStr::from_ptr(result.json_ptr).to_string_lossy().into_owned());
        let error = (!result.error_ptr.is_null())
            .then(|| CStr::from_ptr(result.error_ptr).to_string_lossy().into_owned());
        free_schema_result(result);
        (json, error)
    }

    #[test]
    fn test_infer_schema_ffi() {
        let url = CString::new("https://example.com/").unwrap();
        let (json, error) = unsafe {
            take(infer_schema_from_html(
                HTML.as_ptr() as *const c_char,
                HTML.len(),
                url.as_ptr(),
                ptr::null(),
            ))
        };
        assert!(error.is_none());
        let value: serde_json::Value = serde_json::from_str(&json.unwrap()).unwrap();
        assert_eq!(value["schema"]["container"], "li.item.extra");
        assert_eq!(value["schema"]["schema"]["url"], "https://example.com/");
        assert_eq!(value["schema"]["fields"][0]["type"], "href");
    }

    #[test]
    fn test_ffi_reports_errors() {
        let options = CString::new(r#"{"container_selector": "table.none"}"#).unwrap();
        let (json, error) = unsafe {
            take(infer_schema_from_html(
                HTML.as_ptr() as *const c_char,
                HTML.len(),
                ptr::null(),
                options.as_ptr(),
            ))
        };
        assert!(json.is_none());
        assert!(error.unwrap().contains("table.none"));

        let bad = CString::new("{not json").unwrap();
        let (_, error) = unsafe {
            take(infer_schema_from_html(
                HTML.as_ptr() as *const c_char,
                HTML.len(),
                ptr::null(),
                bad.as_ptr(),
            ))
        };
        assert!(error.unwrap().starts_with("Failed to parse options JSON"));
    }

    #[test]
    fn test_rank_patterns_ffi() {
        let (json, error) = unsafe {
            take(rank_patterns_from_html(
                HTML.as_ptr() as *const c_char,
                HTML.len(),
                ptr::null(),
            ))
        };
        assert!(error.is_none());
        let value: serde_json::Value = serde_json::from_str(&json.unwrap()).unwrap();
        assert_eq!(value[0]["selector"], "li.item.extra");
        assert_eq!(value[0]["item_count"], 3);
    }
}
