//! The single page served at `/`.

use crate::input::ACCEPTED_EXTENSIONS;
use crate::task::Task;

/// Renders the page with the task options and the configured model name.
pub fn render(model: &str) -> String {
    let options: String = Task::ALL
        .iter()
        .map(|task| format!(r#"<option value="{}">{}</option>"#, task.slug(), task.label()))
        .collect::<Vec<_>>()
        .join("\n                ");

    let accept = ACCEPTED_EXTENSIONS
        .iter()
        .map(|ext| format!(".{ext}"))
        .collect::<Vec<_>>()
        .join(",");

    TEMPLATE
        .replace("__TASK_OPTIONS__", &options)
        .replace("__ACCEPT__", &accept)
        .replace("__MODEL__", &escape(model))
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

const TEMPLATE: &str = r#"
<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>GenAI Blog Generator</title>
    <style>
        * {
            margin: 0;
            padding: 0;
            box-sizing: border-box;
        }

        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, Oxygen, Ubuntu, Cantarell, sans-serif;
            background: #f5f7fa;
            min-height: 100vh;
            display: flex;
            justify-content: center;
            padding: 40px 20px;
        }

        .container {
            background: white;
            border-radius: 12px;
            box-shadow: 0 0 10px rgba(0,0,0,0.1);
            max-width: 760px;
            width: 100%;
            padding: 2rem;
            align-self: flex-start;
        }

        .logo {
            width: 80px;
            margin-bottom: 10px;
        }

        h1 {
            color: #333;
            margin-bottom: 10px;
            font-size: 2em;
        }

        .subtitle {
            color: #666;
            margin-bottom: 20px;
        }

        hr {
            border: none;
            border-top: 1px solid #e0e0e0;
            margin: 20px 0;
        }

        label {
            display: block;
            color: #333;
            font-weight: 600;
            margin: 16px 0 6px;
        }

        select, textarea {
            width: 100%;
            font: inherit;
            padding: 10px;
            border: 1px solid #ccc;
            border-radius: 8px;
        }

        textarea {
            height: 120px;
            resize: vertical;
        }

        .preview-image {
            display: none;
            max-width: 100%;
            border-radius: 10px;
            margin-top: 12px;
            box-shadow: 0 4px 15px rgba(0,0,0,0.1);
        }

        .preview-caption {
            display: none;
            color: #666;
            font-size: 0.85em;
            margin-top: 4px;
        }

        .generate {
            background-color: #4CAF50;
            color: white;
            font-weight: bold;
            border: none;
            border-radius: 10px;
            padding: 0.5rem 1rem;
            margin-top: 20px;
            cursor: pointer;
            font-size: 1em;
        }

        .generate:disabled {
            opacity: 0.6;
            cursor: wait;
        }

        .loading {
            text-align: center;
            padding: 30px;
            display: none;
        }

        .spinner {
            border: 4px solid #f3f3f3;
            border-top: 4px solid #4CAF50;
            border-radius: 50%;
            width: 40px;
            height: 40px;
            animation: spin 1s linear infinite;
            margin: 0 auto 12px;
        }

        @keyframes spin {
            0% { transform: rotate(0deg); }
            100% { transform: rotate(360deg); }
        }

        .output {
            display: none;
            margin-top: 30px;
        }

        .output h3 {
            margin-bottom: 10px;
        }

        .result-text {
            background: #e8f5e9;
            color: #1b5e20;
            border-radius: 10px;
            padding: 16px;
            line-height: 1.6;
            white-space: pre-wrap;
        }

        .download {
            background-color: #007ACC;
            color: white;
            border: none;
            border-radius: 8px;
            padding: 0.4rem 1rem;
            margin-top: 12px;
            cursor: pointer;
            font-size: 1em;
        }

        .error {
            background: #fee;
            border: 2px solid #fcc;
            color: #c33;
            padding: 15px;
            border-radius: 10px;
            margin-top: 20px;
            display: none;
        }
    </style>
</head>
<body>
    <div class="container">
        <img class="logo" src="https://cdn-icons-png.flaticon.com/512/857/857681.png" alt="">
        <h1>🧠 GenAI Blog &amp; Topic Generator</h1>
        <p class="subtitle">Unlock your creativity using <strong>Google __MODEL__</strong> with just a prompt or image!</p>

        <hr>

        <form id="generateForm">
            <label for="task">📌 Choose a task</label>
            <select id="task" name="task">
                __TASK_OPTIONS__
            </select>

            <label for="topic">📝 Enter a topic or idea:</label>
            <textarea id="topic" name="topic" placeholder="E.g. AI in education, travel in Europe, etc."></textarea>

            <label for="image">📷 Upload an image (optional)</label>
            <input type="file" id="image" name="image" accept="__ACCEPT__">
            <img id="previewImage" class="preview-image" alt="Preview">
            <div id="previewCaption" class="preview-caption">✅ Image Preview</div>

            <button type="submit" class="generate" id="generateButton">🚀 Generate</button>
        </form>

        <div class="loading" id="loading">
            <div class="spinner"></div>
            <p>Thinking with Gemini...</p>
        </div>

        <div class="error" id="error"></div>

        <div class="output" id="output">
            <h3>📄 Generated Output</h3>
            <div class="result-text" id="resultText"></div>
            <button type="button" class="download" id="downloadButton">📥 Download Result</button>
        </div>
    </div>

    <script>
        const form = document.getElementById('generateForm');
        const imageInput = document.getElementById('image');
        const previewImage = document.getElementById('previewImage');
        const previewCaption = document.getElementById('previewCaption');
        const generateButton = document.getElementById('generateButton');
        const loading = document.getElementById('loading');
        const errorDiv = document.getElementById('error');
        const output = document.getElementById('output');
        const resultText = document.getElementById('resultText');
        const downloadButton = document.getElementById('downloadButton');
        let lastResult = null;

        imageInput.addEventListener('change', (e) => {
            const file = e.target.files[0];
            if (!file) {
                previewImage.style.display = 'none';
                previewCaption.style.display = 'none';
                return;
            }
            const reader = new FileReader();
            reader.onload = (ev) => {
                previewImage.src = ev.target.result;
                previewImage.style.display = 'block';
                previewCaption.style.display = 'block';
            };
            reader.readAsDataURL(file);
        });

        form.addEventListener('submit', async (e) => {
            e.preventDefault();

            generateButton.disabled = true;
            loading.style.display = 'block';
            output.style.display = 'none';
            errorDiv.style.display = 'none';

            try {
                const response = await fetch('/generate', {
                    method: 'POST',
                    body: new FormData(form)
                });

                const result = await response.json();
                if (!response.ok) {
                    throw new Error(result.error || 'Request failed');
                }

                resultText.textContent = result.output;
                lastResult = result;
                output.style.display = 'block';
            } catch (error) {
                errorDiv.textContent = 'Error: ' + error.message;
                errorDiv.style.display = 'block';
            } finally {
                loading.style.display = 'none';
                generateButton.disabled = false;
            }
        });

        // JSON keeps the text's line endings; form encodings rewrite them to CRLF.
        downloadButton.addEventListener('click', async () => {
            if (!lastResult) {
                return;
            }
            try {
                const response = await fetch('/download', {
                    method: 'POST',
                    headers: { 'Content-Type': 'application/json' },
                    body: JSON.stringify({ text: lastResult.output })
                });
                if (!response.ok) {
                    throw new Error('Download failed');
                }
                const blob = await response.blob();
                const url = URL.createObjectURL(blob);
                const link = document.createElement('a');
                link.href = url;
                link.download = lastResult.download.filename;
                document.body.appendChild(link);
                link.click();
                link.remove();
                URL.revokeObjectURL(url);
            } catch (error) {
                errorDiv.textContent = 'Error: ' + error.message;
                errorDiv.style.display = 'block';
            }
        });
    </script>
</body>
</html>
"#;
