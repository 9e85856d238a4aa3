pub const INDEX_HTML: &str = r#"<!doctype html>
<html lang="en">
  <head>
    <meta charset="utf-8" />
    <meta name="viewport" content="width=device-width, initial-scale=1" />
    <title>Single-page app</title>
    <base href="./" />
    <link rel="stylesheet" href="css/app.css" />
  </head>
  <body>
    <nav>
      <a href="home" data-link>Home</a>
      <a href="about" data-link>About</a>
    </nav>
    <main id="view"></main>
    <script src="js/app.js"></script>
  </body>
</html>
"#;

pub const APP_CSS: &str = r#"body { font-family: system-ui, sans-serif; margin: 0; }
nav { display: flex; gap: 1rem; padding: 1rem; background: #1e2030; }
nav a { color: #8aadf4; text-decoration: none; }
main { padding: 2rem; }
"#;

pub const APP_JS: &str = r#"const routes = {
  home: () => '<h1>Home</h1><p>Unknown paths are served index.html, so this router handles them.</p>',
  about: () => '<h1>About</h1><p>Rendered on the client.</p>',
};

function render() {
  const base = document.baseURI;
  const route = location.href.startsWith(base) ? location.href.slice(base.length) : '';
  const page = routes[route.split(/[?#]/)[0]] || routes.home;
  document.getElementById('view').innerHTML = page();
}

document.addEventListener('click', (event) => {
  const link = event.target.closest('[data-link]');
  if (!link) return;
  event.preventDefault();
  history.pushState({}, '', link.href);
  render();
});

window.addEventListener('popstate', render);
render();
"#;
