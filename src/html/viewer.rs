//! Interactive viewer pages
//!
//! The viewer loads the highlighted artifact with pdf.js and opens it at the
//! matched page.

use crate::document::MatchResult;

const PDFJS_VERSION: &str = "3.4.120";

/// URL of the highlighted artifact for `key` and `citation`
pub fn highlighted_url(key: &str, citation: &str) -> String {
    format!(
        "/api/v1/documents/{}/highlighted?q={}",
        urlencoding::encode(key),
        urlencoding::encode(citation)
    )
}

/// Encode a value as a JavaScript literal safe inside `<script>`
fn js_literal(value: &str) -> String {
    serde_json::to_string(value)
        .unwrap_or_else(|_| "\"\"".to_string())
        .replace("</", "<\\/")
}

/// pdf.js viewer opened at the matched page
pub fn viewer_page(key: &str, citation: &str, result: &MatchResult) -> String {
    let page = result.page_number.unwrap_or(1);
    let title = html_escape::encode_text(&format!("\"{}\" - {}", citation, key)).into_owned();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <script src="https://cdnjs.cloudflare.com/ajax/libs/pdf.js/{pdfjs}/pdf.min.js"></script>
    <style>
        body {{ margin: 0; font-family: Arial, sans-serif; background-color: #f0f0f0; }}
        .controls {{
            background: white; padding: 10px; border-bottom: 1px solid #ddd;
            display: flex; align-items: center; justify-content: center; gap: 15px;
            position: sticky; top: 0; z-index: 100;
        }}
        button {{ padding: 8px 16px; background: #007bff; color: white; border: none; border-radius: 4px; cursor: pointer; }}
        button:disabled {{ background: #6c757d; cursor: not-allowed; }}
        #pdf-canvas {{ margin: 20px auto; display: block; box-shadow: 0 2px 10px rgba(0,0,0,0.1); }}
        .loading {{ text-align: center; padding: 100px; font-size: 18px; color: #666; }}
    </style>
</head>
<body>
    <div class="controls">
        <button onclick="prevPage()" id="prev-btn">&larr; Previous</button>
        <span>Page <span id="page-num">{page}</span> of <span id="page-count">-</span> (score {score})</span>
        <button onclick="nextPage()" id="next-btn">Next &rarr;</button>
        <button onclick="goToFoundPage()" id="found-btn">Back to match</button>
    </div>
    <div id="loading" class="loading">Loading highlighted PDF...</div>
    <canvas id="pdf-canvas" style="display: none;"></canvas>
    <script>
        pdfjsLib.GlobalWorkerOptions.workerSrc = 'https://cdnjs.cloudflare.com/ajax/libs/pdf.js/{pdfjs}/pdf.worker.min.js';

        const pdfUrl = {url};
        const foundPage = {page};
        const scale = 1.8;
        let pdfDoc = null;
        let currentPage = foundPage;
        let rendering = false;
        let pending = null;

        pdfjsLib.getDocument(pdfUrl).promise.then(function(pdf) {{
            pdfDoc = pdf;
            document.getElementById('page-count').textContent = pdf.numPages;
            document.getElementById('loading').style.display = 'none';
            document.getElementById('pdf-canvas').style.display = 'block';
            renderPage(currentPage);
        }}).catch(function(error) {{
            document.getElementById('loading').textContent = 'Failed to load PDF: ' + error.message;
        }});

        function renderPage(num) {{
            rendering = true;
            pdfDoc.getPage(num).then(function(page) {{
                const viewport = page.getViewport({{ scale: scale }});
                const canvas = document.getElementById('pdf-canvas');
                canvas.height = viewport.height;
                canvas.width = viewport.width;
                page.render({{ canvasContext: canvas.getContext('2d'), viewport: viewport }}).promise.then(function() {{
                    rendering = false;
                    if (pending !== null) {{
                        const next = pending;
                        pending = null;
                        renderPage(next);
                    }}
                }});
            }});
            currentPage = num;
            document.getElementById('page-num').textContent = num;
            document.getElementById('prev-btn').disabled = num <= 1;
            document.getElementById('next-btn').disabled = num >= pdfDoc.numPages;
        }}

        function queueRenderPage(num) {{
            if (rendering) {{ pending = num; }} else {{ renderPage(num); }}
        }}
        function prevPage() {{ if (pdfDoc && currentPage > 1) queueRenderPage(currentPage - 1); }}
        function nextPage() {{ if (pdfDoc && currentPage < pdfDoc.numPages) queueRenderPage(currentPage + 1); }}
        function goToFoundPage() {{ if (pdfDoc) queueRenderPage(foundPage); }}

        document.addEventListener('keydown', function(event) {{
            if (event.key === 'ArrowLeft') prevPage();
            if (event.key === 'ArrowRight') nextPage();
            if (event.key === 'Home') goToFoundPage();
        }});
    </script>
</body>
</html>
"#,
        title = title,
        pdfjs = PDFJS_VERSION,
        page = page,
        score = result.score,
        url = js_literal(&highlighted_url(key, citation)),
    )
}

/// Page shown when the citation matches no block
pub fn not_found_page(key: &str, citation: &str) -> String {
    let key = html_escape::encode_text(key);
    let citation = html_escape::encode_text(citation);

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>Citation not found - {key}</title>
    <style>
        body {{ font-family: Arial, sans-serif; padding: 50px; text-align: center; }}
        .message {{ color: #d32f2f; font-size: 18px; margin: 20px 0; }}
    </style>
</head>
<body>
    <h1>Citation not found</h1>
    <div class="message">"{citation}" was not found in "{key}"</div>
</body>
</html>
"#,
        key = key,
        citation = citation,
    )
}
