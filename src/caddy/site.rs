//! Site block rendering.

use crate::validation::{Domain, GatewayPort};

/// Render the site block for `domain → 127.0.0.1:port`.
///
/// Output depends only on the arguments. Identity headers listed in
/// `stripped_headers` are removed from any request whose source is not in
/// `trusted_ranges`.
pub fn render_site(
    domain: &Domain,
    port: GatewayPort,
    trusted_ranges: &[String],
    stripped_headers: &[String],
) -> String {
    let mut out = format!("{domain} {{\n  reverse_proxy 127.0.0.1:{port}\n");

    if !stripped_headers.is_empty() {
        out.push_str("\n  # Strip Tailscale identity headers from public internet requests\n");
        out.push_str(&format!(
            "  @not_tailscale not remote_ip {}\n",
            trusted_ranges.join(" ")
        ));
        for header in stripped_headers {
            out.push_str(&format!("  request_header @not_tailscale -{header}\n"));
        }
    }

    out.push_str("}\n");
    out
}
