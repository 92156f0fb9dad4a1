//! Esquema de la base de datos
//!
//! La unicidad de nombre, SKU y código de barras se garantiza con
//! restricciones UNIQUE con nombre, de modo que una violación a nivel de
//! almacenamiento se pueda traducir al conflicto del campo afectado.
//! `codigo_barras` admite múltiples NULL: solo es único cuando está
//! presente.

use pos_adapter_postgres::Migration;

pub fn migraciones() -> Vec<Migration> {
    vec![
        Migration::new(
            1,
            "crear_productos",
            r#"
            CREATE TABLE IF NOT EXISTS productos (
                id BIGSERIAL PRIMARY KEY,
                nombre TEXT NOT NULL,
                descripcion TEXT,
                codigo_interno_sku TEXT NOT NULL,
                codigo_barras TEXT,
                img TEXT,
                stock_disponible BIGINT NOT NULL DEFAULT 0,
                habilitar_stock BOOLEAN NOT NULL DEFAULT FALSE,
                precio_unitario DOUBLE PRECISION NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                CONSTRAINT productos_nombre_key UNIQUE (nombre),
                CONSTRAINT productos_codigo_interno_sku_key UNIQUE (codigo_interno_sku),
                CONSTRAINT productos_codigo_barras_key UNIQUE (codigo_barras)
            )
            "#,
        ),
        Migration::new(
            2,
            "crear_ventas",
            r#"
            CREATE TABLE IF NOT EXISTS ventas (
                id BIGSERIAL PRIMARY KEY,
                tipo TEXT NOT NULL,
                subtotal DOUBLE PRECISION NOT NULL,
                descuento DOUBLE PRECISION NOT NULL,
                total DOUBLE PRECISION NOT NULL,
                cliente_nombre TEXT,
                cliente_contacto TEXT,
                fecha_creacion TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
        ),
        Migration::new(
            3,
            "crear_items_ventas",
            r#"
            CREATE TABLE IF NOT EXISTS items_ventas (
                id BIGSERIAL PRIMARY KEY,
                venta_id BIGINT NOT NULL REFERENCES ventas (id),
                producto_id BIGINT,
                producto_nombre TEXT NOT NULL,
                producto_sku TEXT NOT NULL,
                cantidad BIGINT NOT NULL,
                precio_unitario DOUBLE PRECISION NOT NULL,
                subtotal DOUBLE PRECISION NOT NULL,
                es_personalizado BOOLEAN NOT NULL DEFAULT FALSE
            )
            "#,
        ),
        Migration::new(
            4,
            "indice_items_por_venta",
            "CREATE INDEX IF NOT EXISTS idx_items_ventas_venta_id ON items_ventas (venta_id)",
        ),
    ]
}
