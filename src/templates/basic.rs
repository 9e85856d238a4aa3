pub const INDEX_HTML: &str = r#"<!doctype html>
<html lang="en">
  <head>
    <meta charset="utf-8" />
    <meta name="viewport" content="width=device-width, initial-scale=1" />
    <title>My page</title>
    <link rel="stylesheet" href="style.css" />
  </head>
  <body>
    <h1>Hello from sketchbox</h1>
    <p>Edit this file and save to see the preview update.</p>
    <button id="btn">Click me</button>
    <script src="script.js"></script>
  </body>
</html>
"#;

pub const STYLE_CSS: &str = "body{font-family:system-ui,-apple-system,Segoe UI,Roboto,sans-serif;line-height:1.5;padding:2rem;background:#0b1020;color:#e6e9ef}h1{color:#8aadf4}button{background:#8bd5ca;color:#0b1020;border:none;padding:.6rem 1rem;border-radius:8px;cursor:pointer}button:hover{opacity:.9}\n";

pub const SCRIPT_JS: &str = "document.getElementById('btn')?.addEventListener('click', () => { alert('It works!'); });\n";
