use crate::stream::StreamDescriptor;

/// Closing tail written after the last fragment.
pub const HTML_END: &str = "\t</body>\n</html>\n";

const STYLE: &str = r#"			*,
			*::before,
			*::after {
				box-sizing: border-box;
			}

			html,
			body {
				margin: 0;
				padding: 0;
				width: 100%;
				height: 100%;
				color: white;
				background: black;
				overflow: hidden;
			}

			.container {
				display: flex;
				width: 100%;
				height: 100%;
			}

			#streams {
				display: flex;
				flex-wrap: wrap;
				flex-grow: 1;
				align-items: center;
				align-content: center;
				justify-content: center;
				height: 100%;
			}

			#streams iframe {
				flex-grow: 1;
				aspect-ratio: 16 / 9;
				border: 0;
			}

			.box {
				margin: auto;
			}

			#chat-container {
				display: flex;
				flex-direction: column;
				width: 350px;
				height: 100%;
			}

			#chat-select {
				background: #333;
				color: white;
				border: 1px solid #555;
				border-radius: 4px;
				margin: 6px;
				height: 32px;
			}

			#chat {
				flex-grow: 1;
				width: 100%;
				border: 0;
			}
"#;

const SCRIPT: &str = r#"			const streams = document.getElementById("streams");
			const chat = document.getElementById("chat");
			const chatSelect = document.getElementById("chat-select");
			const iframes = streams.querySelectorAll("iframe");
			const n = iframes.length;

			function adjustLayout() {
				const width = window.innerWidth - 8 - (chat.src !== "about:blank" ? 350 : 0);
				const height = window.innerHeight - 8;

				let bestWidth = 0;
				let bestHeight = 0;
				for (let cols = 1; cols <= n; cols++) {
					const rows = Math.ceil(n / cols);
					let maxWidth = Math.floor(width / cols);
					let maxHeight = Math.floor(height / rows);
					if ((maxWidth * 9) / 16 < maxHeight) {
						maxHeight = Math.floor((maxWidth * 9) / 16);
					} else {
						maxWidth = Math.floor((maxHeight * 16) / 9);
					}
					if (maxWidth > bestWidth) {
						bestWidth = maxWidth;
						bestHeight = maxHeight;
					}
				}
				iframes.forEach((f) => {
					f.style.flexGrow = "0";
					f.style.width = `${bestWidth}px`;
					f.style.height = `${bestHeight}px`;
				});
			}

			function setName(i, name) {
				const option = chatSelect.children[i];
				if (!option) {
					return;
				}
				option.textContent = option.disabled ? `${name} [extension required]` : name;
			}

			if (n > 0) {
				adjustLayout();
				window.addEventListener("resize", adjustLayout);
				chat.addEventListener("load", adjustLayout);
			}
			chatSelect.addEventListener("change", (e) => {
				chat.src = e.target.value;
			});
"#;

/// Per-response random nonce for the CSP and the inline style/script tags.
pub fn nonce() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// JSON-encode a value for embedding inside markup. `<` is escaped so a
/// hostile display name can never terminate the surrounding element.
fn js_string(value: &str) -> String {
    serde_json::to_string(value)
        .unwrap_or_else(|_| "\"\"".to_string())
        .replace('<', "\\u003c")
}

/// One display-name directive, appended to the open body after the shell.
pub fn render_fragment(index: usize, name: &str, nonce: &str) -> String {
    format!(
        "\t\t<script type=\"text/javascript\" nonce=\"{nonce}\">setName({index}, {});</script>\n",
        js_string(name)
    )
}

/// The synchronously-computed part of the document: everything up to (not
/// including) [`HTML_END`]. Names not yet known stay as their ids; fragments
/// fill them in later via `setName`.
pub fn render_shell(descriptors: &[StreamDescriptor], has_capability: bool, nonce: &str) -> String {
    let mut out = String::with_capacity(4096);

    out.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n\t<head>\n");
    out.push_str("\t\t<meta charset=\"utf-8\" />\n");
    out.push_str("\t\t<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\" />\n");
    out.push_str(
        "\t\t<meta name=\"description\" content=\"Watch several live streams side by side.\" />\n",
    );
    out.push_str("\t\t<title>multiview</title>\n");
    out.push_str("\t\t<link rel=\"icon\" href=\"/favicon.ico\" sizes=\"32x32\" />\n");
    out.push_str(&format!("\t\t<style nonce=\"{nonce}\">\n"));
    out.push_str(STYLE);
    out.push_str("\t\t</style>\n\t</head>\n\t<body>\n");

    out.push_str("\t\t<div class=\"container\">\n\t\t\t<div id=\"streams\">\n");
    if descriptors.is_empty() {
        out.push_str("\t\t\t\t<div class=\"box\">no streams</div>\n");
    } else {
        for descriptor in descriptors {
            out.push_str(&format!(
                "\t\t\t\t<iframe src={} name={} frameborder=\"0\" scrolling=\"no\" allowfullscreen=\"true\"></iframe>\n",
                js_string(&descriptor.player),
                js_string(&descriptor.id),
            ));
        }
    }
    out.push_str("\t\t\t</div>\n");

    out.push_str("\t\t\t<div id=\"chat-container\">\n");
    out.push_str("\t\t\t\t<select id=\"chat-select\" aria-label=\"chat\">\n");
    for descriptor in descriptors {
        let usable = has_capability || !descriptor.requires_capability;
        if usable {
            out.push_str(&format!(
                "\t\t\t\t\t<option value={}>{}</option>\n",
                js_string(&descriptor.chat),
                descriptor.id,
            ));
        } else {
            out.push_str(&format!(
                "\t\t\t\t\t<option value={} disabled>{} [extension required]</option>\n",
                js_string(&descriptor.chat),
                descriptor.id,
            ));
        }
    }
    out.push_str("\t\t\t\t</select>\n");

    let initial = descriptors
        .iter()
        .find(|d| has_capability || !d.requires_capability);
    let initial_chat = match initial {
        Some(descriptor) if !descriptor.requires_capability => descriptor.chat.as_str(),
        _ => "about:blank",
    };
    out.push_str(&format!(
        "\t\t\t\t<iframe src={} frameborder=\"0\" scrolling=\"no\" id=\"chat\"></iframe>\n",
        js_string(initial_chat)
    ));
    out.push_str("\t\t\t</div>\n\t\t</div>\n");

    out.push_str(&format!(
        "\t\t<script type=\"text/javascript\" nonce=\"{nonce}\">\n"
    ));
    out.push_str(SCRIPT);
    out.push_str("\t\t</script>\n");

    out
}
