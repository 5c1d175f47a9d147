//! Page scripts used to find controls by their visible text.

use serde::Deserialize;

/// Where a control was found, in viewport coordinates.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub(crate) struct ControlLocation {
    pub x: f64,
    pub y: f64,
    pub text: String,
}

/// Build a script that finds the innermost visible element whose text
/// contains any of `labels` (on equal text, the later element in document
/// order wins), scrolls its clickable ancestor into view and returns that
/// ancestor's centre, or `null`.
pub(crate) fn locate_control_script(labels: &[String]) -> String {
    let labels = serde_json::to_string(labels).unwrap_or_else(|_| "[]".to_string());
    format!(
        r#"(() => {{
  const norm = s => (s || '').replace(/\s+/g, ' ').trim().toLowerCase();
  const wanted = {labels}.map(norm).filter(l => l.length > 0);
  if (wanted.length === 0) return null;
  const textOf = el => norm(el.innerText || el.value || el.getAttribute('aria-label'));
  const visible = el => {{
    const r = el.getBoundingClientRect();
    const s = window.getComputedStyle(el);
    return r.width > 0 && r.height > 0 && s.visibility !== 'hidden' && s.display !== 'none' && !el.disabled;
  }};
  let best = null;
  let bestLen = Infinity;
  for (const el of document.querySelectorAll('body *')) {{
    const text = textOf(el);
    if (!text || text.length > bestLen || !wanted.some(w => text.includes(w))) continue;
    if (!visible(el)) continue;
    best = el;
    bestLen = text.length;
  }}
  if (!best) return null;
  const target = best.closest('button, a, [role="button"], input[type="button"], input[type="submit"]') || best;
  target.scrollIntoView({{block: 'center', inline: 'center'}});
  const r = target.getBoundingClientRect();
  return {{x: r.left + r.width / 2, y: r.top + r.height / 2, text: textOf(target).slice(0, 80)}};
}})()"#
    )
}
